use std::collections::BTreeMap;

use tokio::sync::{broadcast, RwLock};
use tracing::debug;

/// Capacity of the refresh fan-out channel. A session that falls further
/// behind than this skips the missed events and re-syncs from the live
/// cache on its next delivery.
const REFRESH_CAPACITY: usize = 100;

#[derive(Debug, Default)]
struct DocEntry {
    html: String,
    seen: bool,
}

#[derive(Debug, Default)]
struct Documents {
    docs: BTreeMap<String, DocEntry>,
}

/// Process-wide document state: the rendered-HTML cache, the per-document
/// seen flags, and the refresh channel that fans updates out to viewer
/// sessions.
///
/// The render pipeline is the sole writer; viewer sessions only read, apart
/// from marking their own focused document seen when they consume a
/// delivery.
pub struct DocStore {
    documents: RwLock<Documents>,
    refresh: broadcast::Sender<String>,
}

impl DocStore {
    pub fn new() -> Self {
        let (refresh, _) = broadcast::channel(REFRESH_CAPACITY);
        Self {
            documents: RwLock::new(Documents::default()),
            refresh,
        }
    }

    /// Pre-register a watched document so it shows up in the navigation
    /// listing (as unseen) before its first render completes.
    pub async fn register(&self, id: &str) {
        let mut documents = self.documents.write().await;
        documents.docs.entry(id.to_string()).or_default();
    }

    /// Store a fresh render for `id` and notify all connected sessions.
    ///
    /// Every seen flag is reset: each session re-marks its own focus as it
    /// consumes the update, so documents nobody is currently viewing stay
    /// emphasized in the navigation until someone looks at them.
    pub async fn update(&self, id: &str, html: String) {
        {
            let mut documents = self.documents.write().await;
            for entry in documents.docs.values_mut() {
                entry.seen = false;
            }
            let entry = documents.docs.entry(id.to_string()).or_default();
            entry.html = html;
        }
        // Send only fails when no session is subscribed, which is fine.
        let _ = self.refresh.send(id.to_string());
        debug!("Published refresh for '{}'", id);
    }

    /// Subscribe to refresh notifications. Events carry the changed
    /// document id; payloads are always rebuilt from the cache at delivery
    /// time.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.refresh.subscribe()
    }

    /// Build the combined payload for a session focused on `id`: the
    /// navigation listing plus the focused document's latest HTML.
    ///
    /// Marks the focus seen before building the nav, so a viewer's own
    /// document never renders as unseen in its own navigation. A document
    /// is only marked seen once it has HTML to consume.
    pub async fn deliver(&self, id: &str) -> String {
        let mut documents = self.documents.write().await;
        if let Some(entry) = documents.docs.get_mut(id) {
            if !entry.html.is_empty() {
                entry.seen = true;
            }
        }
        let body = documents
            .docs
            .get(id)
            .map(|entry| entry.html.as_str())
            .unwrap_or_default();
        format!(
            "{}<article class=\"markdown-body\">{}</article>",
            nav(&documents),
            body
        )
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorted navigation listing; unseen documents are emphasized.
fn nav(documents: &Documents) -> String {
    let mut markup = String::from("<nav><ul>");
    for (id, entry) in &documents.docs {
        let label = if entry.seen {
            id.clone()
        } else {
            format!("<em>{}</em>", id)
        };
        markup.push_str(&format!("<li><a href=\"/{}\">{}</a></li>", id, label));
    }
    markup.push_str("</ul></nav>");
    markup
}
