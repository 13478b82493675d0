use reqwest::StatusCode;
use thiserror::Error;

/// Failure to acquire a required external resource at startup. Any of these
/// terminates the process before the server comes up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("watcher initialization failed: {0}")]
    Watch(#[from] notify::Error),
}

/// Per-document render failure. Logged by the pipeline; the document keeps
/// its previously cached HTML and connected sessions are unaffected.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("render request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("render service returned {0}")]
    Status(StatusCode),
}
