use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    response::{Html, IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::debug;

use crate::assets;
use crate::AppState;

/// Fallback route: document paths get the viewer shell, everything else is
/// served verbatim from the working directory.
pub async fn page_or_static(State(state): State<Arc<AppState>>, req: Request) -> Response {
    let path = req.uri().path().to_string();
    if is_document(&path) {
        debug!("Serving viewer shell for '{}'", path);
        return Html(assets::page(&state.style)).into_response();
    }

    match ServeDir::new(&state.root).oneshot(req).await {
        Ok(res) => res.map(Body::new),
        Err(infallible) => match infallible {},
    }
}

/// The root path serves the navigation-only shell; anything ending in `.md`
/// serves the shell focused on that document.
fn is_document(path: &str) -> bool {
    path == "/"
        || std::path::Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_paths_are_documents() {
        assert!(is_document("/README.md"));
        assert!(is_document("/docs/guide.MD"));
        assert!(is_document("/"));
    }

    #[test]
    fn other_paths_are_static() {
        assert!(!is_document("/logo.png"));
        assert!(!is_document("/styles.css"));
        assert!(!is_document("/README"));
    }
}
