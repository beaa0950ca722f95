use std::sync::Arc;

use tokio::sync::RwLock;

use esistatus_core::StatusSnapshot;

/// Shared handle to the most recently published snapshot.
///
/// The updater publishes, the fragment renderers read. Empty until the
/// first successful update; a failed update never clears it.
#[derive(Debug, Clone, Default)]
pub struct StatusStore {
    inner: Arc<RwLock<Option<StatusSnapshot>>>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publish(&self, snapshot: StatusSnapshot) {
        let mut guard = self.inner.write().await;
        *guard = Some(snapshot);
    }

    pub async fn snapshot(&self) -> Option<StatusSnapshot> {
        self.inner.read().await.clone()
    }
}
