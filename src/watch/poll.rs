use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::sync::mpsc;
use tracing::debug;

/// Polling change source: compares file modification times on a fixed
/// interval. Same contract as the notifier, for filesystems where OS
/// notifications are unavailable or unreliable (network mounts, some
/// containers).
pub fn spawn(paths: Vec<PathBuf>, interval: Duration) -> mpsc::UnboundedReceiver<PathBuf> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut mtimes = HashMap::new();
        for path in &paths {
            if let Some(mtime) = modified(path) {
                mtimes.insert(path.clone(), mtime);
            }
            if tx.send(path.clone()).is_err() {
                return;
            }
        }

        let mut tick = tokio::time::interval(interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tick.tick().await;
            for path in collect_changed(&mut mtimes, &paths) {
                debug!("Modification time advanced for {}", path.display());
                if tx.send(path).is_err() {
                    return;
                }
            }
        }
    });

    rx
}

/// Paths whose modification time moved past the recorded one. Records the
/// new times in place. Unreadable paths are skipped until they reappear.
fn collect_changed(
    mtimes: &mut HashMap<PathBuf, SystemTime>,
    paths: &[PathBuf],
) -> Vec<PathBuf> {
    let mut changed = Vec::new();
    for path in paths {
        let Some(mtime) = modified(path) else {
            continue;
        };
        match mtimes.get(path) {
            Some(prev) if *prev >= mtime => {}
            _ => {
                mtimes.insert(path.clone(), mtime);
                changed.push(path.clone());
            }
        }
    }
    changed
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).ok().and_then(|m| m.modified().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn unchanged_file_is_not_reported() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.md");
        fs::write(&file, "# a").unwrap();

        let paths = vec![file.clone()];
        let mut mtimes = HashMap::new();
        assert_eq!(collect_changed(&mut mtimes, &paths), vec![file]);
        assert!(collect_changed(&mut mtimes, &paths).is_empty());
    }

    #[test]
    fn advanced_mtime_is_reported_once() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.md");
        fs::write(&file, "# a").unwrap();

        let paths = vec![file.clone()];
        let mut mtimes = HashMap::new();
        collect_changed(&mut mtimes, &paths);

        // Backdate the recorded time; the file now looks freshly written.
        mtimes.insert(file.clone(), SystemTime::UNIX_EPOCH);
        assert_eq!(collect_changed(&mut mtimes, &paths), vec![file]);
        assert!(collect_changed(&mut mtimes, &paths).is_empty());
    }

    #[test]
    fn missing_file_is_skipped_until_it_appears() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("late.md");

        let paths = vec![file.clone()];
        let mut mtimes = HashMap::new();
        assert!(collect_changed(&mut mtimes, &paths).is_empty());

        fs::write(&file, "# late").unwrap();
        assert_eq!(collect_changed(&mut mtimes, &paths), vec![file]);
    }

    #[tokio::test]
    async fn every_watched_path_is_emitted_at_startup() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.md");
        fs::write(&a, "# a").unwrap();
        // Missing paths still get their initial emission; the render
        // failure is the pipeline's to log.
        let b = dir.path().join("missing.md");

        let mut changes = spawn(vec![a.clone(), b.clone()], Duration::from_secs(3600));
        assert_eq!(changes.recv().await.unwrap(), a);
        assert_eq!(changes.recv().await.unwrap(), b);
    }
}
