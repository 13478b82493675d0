use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::{health_check, page_or_static};
use crate::websocket::handler::websocket_handler;
use crate::AppState;

/// Create the application routes
pub fn create_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        // Bare route for the navigation-only landing session
        .route("/sock", get(websocket_handler))
        .route("/sock/*path", get(websocket_handler))
        .fallback(page_or_static)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
