pub mod notifier;
pub mod poll;

use std::path::{Path, PathBuf};

/// Map a filesystem path (absolute from the notifier, or as given on the
/// command line) to its document identifier: the path relative to the
/// working directory, which is also the URL path the document is served
/// under.
pub fn doc_id(path: &Path, root: &Path) -> String {
    let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    resolved
        .strip_prefix(root)
        .unwrap_or(&resolved)
        .to_string_lossy()
        .into_owned()
}
