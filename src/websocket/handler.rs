use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::AppState;

/// WebSocket upgrade for a viewer session. The wildcard path names the
/// document the session focuses on; the bare `/sock` route carries no
/// focus and serves the navigation-only landing page.
pub async fn websocket_handler(
    path: Option<Path<String>>,
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let focus = path.map(|Path(p)| p).unwrap_or_default();
    info!("New viewer connection attempt for '{}'", focus);
    ws.on_upgrade(move |socket| handle_socket(socket, focus, state))
}

/// Drive one viewer session until the client goes away.
async fn handle_socket(socket: WebSocket, focus: String, state: Arc<AppState>) {
    // Unique id to tell concurrent sessions apart in the logs
    let connection_id = Uuid::new_v4();
    info!(
        "Viewer session {} established, focused on '{}'",
        connection_id, focus
    );

    let (mut sender, mut receiver) = socket.split();
    let mut events = state.store.subscribe();

    // Initial push: the then-current cache snapshot for this focus.
    let payload = state.store.deliver(&focus).await;
    if sender.send(Message::Text(payload)).await.is_err() {
        info!("Viewer session {} closed before first push", connection_id);
        return;
    }

    // Pump refresh events into this session's own sink. The payload is
    // rebuilt from the live cache on every event, so a lagged receiver
    // simply coalesces the missed updates into its next push.
    let store = state.store.clone();
    let push_focus = focus.clone();
    let mut push_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(changed) => {
                    debug!(
                        "Session {} refreshing after update of '{}'",
                        connection_id, changed
                    );
                    let payload = store.deliver(&push_focus).await;
                    if sender.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        "Session {} lagged, coalescing {} missed events",
                        connection_id, skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Drain the client stream; its end signals disconnect.
    let mut close_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut push_task) => close_task.abort(),
        _ = (&mut close_task) => push_task.abort(),
    };
    info!("Viewer session {} terminated", connection_id);
}
