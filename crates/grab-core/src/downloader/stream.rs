//! Per-transfer state driven by libcurl's header, write and progress callbacks.
//!
//! The destination file is opened lazily on the first body chunk (or after
//! `perform` for an empty body), once the final response head is known.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::control::CancelToken;
use crate::error::DownloadError;
use crate::progress::DownloadProgress;
use crate::response::HeaderCollector;
use crate::url_model::{media_type, resolve_filename};

use super::emitter::Emitter;

/// A failed transfer plus the destination it left on disk, if any.
#[derive(Debug)]
pub(super) struct Failure {
    pub(super) error: DownloadError,
    pub(super) kept_file: Option<PathBuf>,
}

impl Failure {
    /// Terminal `Error` snapshot naming the file that was written, if any.
    pub(super) fn snapshot(&self) -> DownloadProgress {
        let path = self.error.path().or(self.kept_file.as_deref());
        DownloadProgress::error(self.error.snapshot_message(), path)
    }
}

impl From<DownloadError> for Failure {
    fn from(error: DownloadError) -> Self {
        Self {
            error,
            kept_file: None,
        }
    }
}

impl From<curl::Error> for Failure {
    fn from(e: curl::Error) -> Self {
        DownloadError::Network(e).into()
    }
}

/// Open destination file plus counters.
struct Output {
    file: File,
    path: PathBuf,
    total_bytes: u64,
    written: u64,
}

pub(super) struct StreamState<'a, 'cb> {
    url: &'a str,
    download_dir: &'a Path,
    cancel: &'a CancelToken,
    emitter: &'a mut Emitter<'cb>,
    headers: HeaderCollector,
    output: Option<Output>,
    /// First failure seen inside a callback; takes precedence over curl's error.
    failure: Option<DownloadError>,
}

impl<'a, 'cb> StreamState<'a, 'cb> {
    pub(super) fn new(
        url: &'a str,
        download_dir: &'a Path,
        cancel: &'a CancelToken,
        emitter: &'a mut Emitter<'cb>,
    ) -> Self {
        Self {
            url,
            download_dir,
            cancel,
            emitter,
            headers: HeaderCollector::new(),
            output: None,
            failure: None,
        }
    }

    pub(super) fn header(&mut self, data: &[u8]) -> bool {
        if self.cancel.is_cancelled() {
            self.fail(DownloadError::Cancelled);
            return false;
        }
        self.headers.push(data);
        true
    }

    /// Writes one received buffer. Returning a short count makes curl abort
    /// with a write error; the reason is kept in `failure`.
    pub(super) fn write(&mut self, data: &[u8]) -> Result<usize, curl::easy::WriteError> {
        if self.cancel.is_cancelled() {
            self.fail(DownloadError::Cancelled);
            return Ok(0);
        }
        if self.output.is_none() {
            if let Err(e) = self.open_output() {
                self.fail(e);
                return Ok(0);
            }
        }
        let Some(out) = self.output.as_mut() else {
            return Ok(0);
        };
        if let Err(e) = out.file.write_all(data) {
            tracing::warn!(path = %out.path.display(), "write failed: {}", e);
            self.fail(DownloadError::Io(e));
            return Ok(0);
        }
        out.written += data.len() as u64;
        let snapshot = DownloadProgress::running(out.written, out.total_bytes, &out.path);
        self.emitter.emit(snapshot, false);
        Ok(data.len())
    }

    /// libcurl progress callback: false aborts the transfer.
    pub(super) fn keep_going(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Classifies the outcome once `perform` has returned. A cancelled
    /// transfer loses its partial file; any other failure keeps it.
    pub(super) fn finish(
        mut self,
        performed: Result<(), curl::Error>,
    ) -> Result<DownloadProgress, Failure> {
        match self.complete(performed) {
            Ok(done) => Ok(done),
            Err(DownloadError::Cancelled) => {
                self.discard_partial();
                Err(DownloadError::Cancelled.into())
            }
            Err(error) => Err(Failure {
                error,
                kept_file: self.output.as_ref().map(|out| out.path.clone()),
            }),
        }
    }

    fn complete(&mut self, performed: Result<(), curl::Error>) -> Result<DownloadProgress, DownloadError> {
        if let Err(e) = performed {
            return Err(match self.failure.take() {
                Some(failure) => failure,
                None if self.cancel.is_cancelled() => DownloadError::Cancelled,
                None => DownloadError::Network(e),
            });
        }
        if let Some(failure) = self.failure.take() {
            return Err(failure);
        }
        if self.cancel.is_cancelled() {
            return Err(DownloadError::Cancelled);
        }
        if self.output.is_none() {
            // Empty body: nothing reached the write callback.
            self.open_output()?;
        }
        let Some(mut out) = self.output.take() else {
            return Err(DownloadError::Unclassified("destination was never opened".into()));
        };
        out.file.flush()?;
        drop(out.file);

        let written_len = fs::metadata(&out.path).map(|m| m.len()).unwrap_or(0);
        if written_len == 0 {
            return Err(DownloadError::WriteFailure { path: out.path });
        }
        let final_size = if out.total_bytes > 0 {
            out.total_bytes
        } else {
            written_len
        };
        tracing::debug!(
            path = %out.path.display(),
            received = out.written,
            final_size,
            "transfer complete"
        );
        Ok(DownloadProgress::done(final_size, &out.path))
    }

    /// Checks the final status, resolves the destination and announces it with
    /// a forced `Running` snapshot before any byte is written.
    fn open_output(&mut self) -> Result<(), DownloadError> {
        let head = self.headers.head();
        match head.status {
            None => {
                return Err(DownloadError::Unclassified("response without status line".into()));
            }
            Some(code) if !head.is_success() => {
                return Err(DownloadError::HttpStatus { code });
            }
            Some(_) => {}
        }

        let total_bytes = head.content_length.unwrap_or(0);
        let dir = absolute_dir(self.download_dir)?;
        fs::create_dir_all(&dir)?;

        let mime = head.content_type.as_deref().and_then(media_type);
        let filename = resolve_filename(self.url, head.content_disposition.as_deref(), mime);
        let path = dir.join(filename);
        let file = File::create(&path)?;
        tracing::info!(path = %path.display(), total_bytes, mime = ?mime, "writing destination");

        self.emitter
            .emit(DownloadProgress::running(0, total_bytes, &path), true);
        self.output = Some(Output {
            file,
            path,
            total_bytes,
            written: 0,
        });
        Ok(())
    }

    fn fail(&mut self, error: DownloadError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    /// Closes and removes a partially written destination.
    fn discard_partial(&mut self) {
        if let Some(out) = self.output.take() {
            drop(out.file);
            match fs::remove_file(&out.path) {
                Ok(()) => tracing::debug!(path = %out.path.display(), "removed partial file"),
                Err(e) => tracing::warn!(path = %out.path.display(), "could not remove partial file: {}", e),
            }
        }
    }
}

fn absolute_dir(dir: &Path) -> Result<PathBuf, DownloadError> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}
