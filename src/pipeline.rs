use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::clients::render_client::RenderClient;
use crate::store::DocStore;
use crate::watch;

/// The render pipeline: consumes changed paths, renders each document, and
/// publishes the fresh HTML to the store (which fans the update out to all
/// connected sessions).
///
/// Sole writer to the document store, so updates to any single document are
/// totally ordered. A failed render is logged and leaves the previous cache
/// entry in place.
pub async fn run(
    mut changes: mpsc::UnboundedReceiver<PathBuf>,
    renderer: RenderClient,
    store: Arc<DocStore>,
    root: PathBuf,
) {
    while let Some(path) = changes.recv().await {
        let id = watch::doc_id(&path, &root);
        match renderer.render(&path).await {
            Ok(html) => {
                info!("Rendered '{}' ({} bytes)", id, html.len());
                store.update(&id, html).await;
            }
            Err(e) => error!("Failed to render '{}': {}", id, e),
        }
    }
    info!("Change stream ended, render pipeline stopping");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn failed_render_leaves_cache_untouched() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let missing = root.join("missing.md");

        let store = Arc::new(DocStore::new());
        store.register("missing.md").await;

        let renderer = RenderClient::new(None, None, None).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(missing).unwrap();
        drop(tx);

        // The read fails before any render call is made; the pipeline logs
        // and moves on.
        run(rx, renderer, store.clone(), root).await;

        let payload = store.deliver("missing.md").await;
        assert!(payload.contains("<article class=\"markdown-body\"></article>"));
        assert!(payload.contains("<em>missing.md</em>"));
    }
}
