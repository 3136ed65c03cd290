//! Failure classification for a download invocation.

use std::path::{Path, PathBuf};

/// Why a download ended in the `Error` state.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Final response status outside `200..=299`. Never retried.
    #[error("HTTP {code}")]
    HttpStatus { code: u32 },

    /// Connect/read timeout, DNS failure, connection reset, TLS failure.
    #[error("{0}")]
    Network(#[from] curl::Error),

    /// The transfer finished but the destination is missing or empty.
    #[error("file was not written: {}", path.display())]
    WriteFailure { path: PathBuf },

    /// Local storage failure (create directory, open, write, flush).
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The cancel token was set while the transfer was running.
    #[error("download cancelled")]
    Cancelled,

    #[error("{0}")]
    Unclassified(String),
}

impl DownloadError {
    /// Short name of the failure class.
    pub fn kind_name(&self) -> &'static str {
        match self {
            DownloadError::HttpStatus { .. } => "HttpStatusError",
            DownloadError::Network(_) => "NetworkError",
            DownloadError::WriteFailure { .. } => "WriteFailureError",
            DownloadError::Io(_) => "IoError",
            DownloadError::Cancelled => "Cancelled",
            DownloadError::Unclassified(_) => "UnclassifiedError",
        }
    }

    /// Destination path, for failures tied to a specific file.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DownloadError::WriteFailure { path } => Some(path.as_path()),
            _ => None,
        }
    }

    /// Text carried by the terminal `Error` snapshot: the description, or the
    /// kind name when the description is blank.
    pub fn snapshot_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            self.kind_name().to_string()
        } else {
            message
        }
    }
}
