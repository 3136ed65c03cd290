//! Background download service.
//!
//! Runs one engine invocation on a dedicated worker thread and publishes every
//! snapshot it produces to an injected [`ProgressSink`], so observers on other
//! threads or tasks only ever look at the sink.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::control::CancelToken;
use crate::downloader::Downloader;
use crate::progress::DownloadProgress;
use crate::sink::ProgressSink;

/// Starts downloads off the caller's thread and feeds the sink.
#[derive(Clone)]
pub struct DownloadService {
    downloader: Arc<dyn Downloader>,
    sink: ProgressSink,
}

impl DownloadService {
    pub fn new(downloader: Arc<dyn Downloader>, sink: ProgressSink) -> Self {
        Self { downloader, sink }
    }

    pub fn sink(&self) -> &ProgressSink {
        &self.sink
    }

    /// Starts downloading `url` on a new worker thread. The sink is set to a
    /// fresh `Idle` snapshot first, superseding the previous invocation's
    /// terminal value.
    pub fn start(&self, url: impl Into<String>) -> Result<DownloadHandle> {
        let url = url.into();
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let downloader = Arc::clone(&self.downloader);
        let sink = self.sink.clone();

        sink.publish(DownloadProgress::default());
        tracing::debug!(url = %url, "starting download worker");

        let worker = std::thread::Builder::new()
            .name("grab-download".to_string())
            .spawn(move || {
                let mut last = None;
                downloader.download(&url, &token, &mut |snapshot: DownloadProgress| {
                    last = Some(snapshot.clone());
                    sink.publish(snapshot);
                });
                last
            })
            .context("failed to spawn download worker")?;

        Ok(DownloadHandle { cancel, worker })
    }
}

/// Handle to one running download.
pub struct DownloadHandle {
    cancel: CancelToken,
    worker: JoinHandle<Option<DownloadProgress>>,
}

impl DownloadHandle {
    /// Ask the worker to stop. The terminal snapshot will be an `Error`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Waits for the worker and returns the last snapshot it produced.
    pub fn join(self) -> Result<Option<DownloadProgress>> {
        self.worker
            .join()
            .map_err(|e| anyhow::anyhow!("download worker panicked: {:?}", e))
    }
}
