use std::path::PathBuf;

use notify::event::{EventKind, ModifyKind};
use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::models::StartupError;

/// Start the OS-notification change source.
///
/// The returned stream yields every watched path once up front (so each
/// document gets an initial render before its first edit), then one path
/// per observed write event. No debouncing: rapid repeated writes come
/// through back to back. Watcher errors are logged and never end the
/// stream.
pub fn spawn(paths: Vec<PathBuf>) -> Result<mpsc::UnboundedReceiver<PathBuf>, StartupError> {
    let (tx, rx) = mpsc::unbounded_channel();

    let event_tx = tx.clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) => {
                if !is_write(&event.kind) {
                    return;
                }
                for path in event.paths {
                    debug!("Write event for {}", path.display());
                    // Send only fails once the pipeline is gone.
                    let _ = event_tx.send(path);
                }
            }
            Err(e) => error!("Watch error: {}", e),
        }
    })?;

    for path in &paths {
        if let Err(e) = watcher.watch(path, RecursiveMode::Recursive) {
            // Keep watching the remaining paths.
            error!("Failed to watch {}: {}", path.display(), e);
        }
    }

    // Emit the initial round, then park to keep the watcher alive for the
    // lifetime of the process.
    tokio::spawn(async move {
        for path in paths {
            if tx.send(path).is_err() {
                return;
            }
        }
        let _watcher = watcher;
        std::future::pending::<()>().await;
    });

    Ok(rx)
}

/// Write-type events only; metadata changes and renames without a data
/// write are dropped.
fn is_write(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any)
    )
}
