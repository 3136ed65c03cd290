//! Streaming single-request HTTP GET over libcurl.

use std::cell::RefCell;

use crate::control::CancelToken;
use crate::error::DownloadError;
use crate::progress::DownloadProgress;

use super::emitter::Emitter;
use super::stream::{Failure, StreamState};
use super::{Downloader, EngineOptions};

/// Redirect hops followed before giving up.
const MAX_REDIRECTIONS: u32 = 10;

/// libcurl accepts receive buffers between 1 KiB and 512 KiB.
const MIN_BUFFER_SIZE: usize = 1024;
const MAX_BUFFER_SIZE: usize = 512 * 1024;

/// [`Downloader`] backed by one libcurl easy handle per invocation.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    options: EngineOptions,
}

impl HttpDownloader {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    /// Runs the transfer; the handle and the destination file are closed when
    /// this returns, on every path.
    fn run(
        &self,
        url: &str,
        cancel: &CancelToken,
        emitter: &mut Emitter<'_>,
    ) -> Result<DownloadProgress, Failure> {
        if cancel.is_cancelled() {
            return Err(DownloadError::Cancelled.into());
        }
        let opts = &self.options;

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTIONS)?;
        easy.useragent(concat!("grab/", env!("CARGO_PKG_VERSION")))?;
        easy.connect_timeout(opts.connect_timeout)?;
        // Read timeout: abort when under 1 byte/s for the whole window.
        easy.low_speed_limit(1)?;
        easy.low_speed_time(opts.read_timeout)?;
        easy.buffer_size(opts.buffer_size.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE))?;
        easy.progress(true)?;

        let state = RefCell::new(StreamState::new(url, &opts.download_dir, cancel, emitter));
        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| state.borrow_mut().header(data))?;
            transfer.write_function(|data| state.borrow_mut().write(data))?;
            transfer.progress_function(|_, _, _, _| state.borrow().keep_going())?;
            transfer.perform()
        };
        state.into_inner().finish(performed)
    }
}

impl Downloader for HttpDownloader {
    fn download(
        &self,
        url: &str,
        cancel: &CancelToken,
        on_progress: &mut dyn FnMut(DownloadProgress),
    ) {
        tracing::info!(url, "download started");
        let mut emitter = Emitter::new(self.options.ui_min_interval, on_progress);

        let terminal = match self.run(url, cancel, &mut emitter) {
            Ok(done) => {
                tracing::info!(
                    url,
                    bytes = done.total_bytes,
                    path = ?done.file_path,
                    "download finished"
                );
                done
            }
            Err(failure) => {
                tracing::warn!(
                    url,
                    kind = failure.error.kind_name(),
                    kept = ?failure.kept_file,
                    "download failed: {}",
                    failure.error
                );
                failure.snapshot()
            }
        };
        emitter.emit(terminal, true);
    }
}
