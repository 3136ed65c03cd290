//! Download progress snapshots.
//!
//! A [`DownloadProgress`] is an immutable value describing one instant of a
//! transfer. The engine builds a fresh snapshot for every state change and
//! never mutates one after handing it out.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Lifecycle of one download invocation. Transitions only move forward:
/// `Idle → Running → Done | Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    #[default]
    Idle,
    Running,
    Done,
    Error,
}

impl DownloadStatus {
    /// `Done` and `Error` end an invocation; nothing follows them.
    pub fn is_terminal(self) -> bool {
        matches!(self, DownloadStatus::Done | DownloadStatus::Error)
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DownloadStatus::Idle => "idle",
            DownloadStatus::Running => "running",
            DownloadStatus::Done => "done",
            DownloadStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Snapshot of transfer state for one download.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DownloadProgress {
    /// Bytes written to the destination file so far.
    pub downloaded_bytes: u64,
    /// Expected total size in bytes; 0 when the server did not announce one.
    pub total_bytes: u64,
    pub status: DownloadStatus,
    /// Absolute destination path, once resolved.
    pub file_path: Option<PathBuf>,
    /// Set only for `Error` snapshots.
    pub error_message: Option<String>,
}

impl DownloadProgress {
    /// In-flight snapshot.
    pub fn running(downloaded_bytes: u64, total_bytes: u64, file_path: &Path) -> Self {
        Self {
            downloaded_bytes,
            total_bytes,
            status: DownloadStatus::Running,
            file_path: Some(file_path.to_path_buf()),
            error_message: None,
        }
    }

    /// Terminal success snapshot: downloaded and total both equal the final size.
    pub fn done(final_size: u64, file_path: &Path) -> Self {
        Self {
            downloaded_bytes: final_size,
            total_bytes: final_size,
            status: DownloadStatus::Done,
            file_path: Some(file_path.to_path_buf()),
            error_message: None,
        }
    }

    /// Terminal failure snapshot. Byte counters are reset to zero.
    pub fn error(message: impl Into<String>, file_path: Option<&Path>) -> Self {
        Self {
            downloaded_bytes: 0,
            total_bytes: 0,
            status: DownloadStatus::Error,
            file_path: file_path.map(Path::to_path_buf),
            error_message: Some(message.into()),
        }
    }

    pub fn has_total(&self) -> bool {
        self.total_bytes > 0
    }

    /// Completion in percent, rounded and clamped to `0..=100`; 0 without a total.
    pub fn percent(&self) -> u8 {
        if !self.has_total() {
            return 0;
        }
        let pct = (self.downloaded_bytes as f64 / self.total_bytes as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }

    /// Completion in `[0.0, 1.0]`; 0 without a total.
    pub fn fraction(&self) -> f64 {
        if !self.has_total() {
            return 0.0;
        }
        (self.downloaded_bytes as f64 / self.total_bytes as f64).clamp(0.0, 1.0)
    }

    pub fn is_done(&self) -> bool {
        self.status == DownloadStatus::Done
    }

    pub fn is_error(&self) -> bool {
        self.status == DownloadStatus::Error
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
