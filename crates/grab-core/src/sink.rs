//! Latest-value progress broadcast.
//!
//! The engine reports through a synchronous callback on its worker thread;
//! [`ProgressSink`] makes the most recent snapshot available to any other
//! context. It keeps a single slot: late subscribers see only the newest
//! value, never the history.

use std::sync::Arc;
use tokio::sync::watch;

use crate::progress::DownloadProgress;

/// Single-slot broadcast of the latest [`DownloadProgress`]. Cheap to clone;
/// clones publish into the same slot.
#[derive(Debug, Clone)]
pub struct ProgressSink {
    tx: Arc<watch::Sender<Option<DownloadProgress>>>,
}

impl ProgressSink {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current value and wake subscribers. Succeeds with or
    /// without live subscribers.
    pub fn publish(&self, snapshot: DownloadProgress) {
        self.tx.send_replace(Some(snapshot));
    }

    pub fn current_value(&self) -> Option<DownloadProgress> {
        self.tx.borrow().clone()
    }

    /// Clear the slot (back to "no download yet").
    pub fn reset(&self) {
        self.tx.send_replace(None);
    }

    /// New receiver positioned at the current value.
    pub fn subscribe(&self) -> watch::Receiver<Option<DownloadProgress>> {
        self.tx.subscribe()
    }
}

impl Default for ProgressSink {
    fn default() -> Self {
        Self::new()
    }
}
