//! Download engine.
//!
//! Performs one sequential GET per invocation, streams the body to the
//! downloads directory and reports progress through a callback: a forced
//! `Running` snapshot once the destination is known, throttled `Running`
//! snapshots while bytes arrive, and exactly one terminal `Done` or `Error`.

mod emitter;
mod engine;
mod stream;

pub use emitter::Emitter;
pub use engine::HttpDownloader;

use std::path::PathBuf;
use std::time::Duration;

use crate::config::GrabConfig;
use crate::control::CancelToken;
use crate::progress::DownloadProgress;
use crate::throttle::DEFAULT_UI_MIN_INTERVAL;

/// Something that can download a URL while reporting progress.
///
/// `download` blocks the calling thread until the transfer ends and never
/// returns an error: failures arrive as the terminal `Error` snapshot.
pub trait Downloader: Send + Sync {
    fn download(
        &self,
        url: &str,
        cancel: &CancelToken,
        on_progress: &mut dyn FnMut(DownloadProgress),
    );
}

/// Engine tunables.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Where destination files are created (created if absent).
    pub download_dir: PathBuf,
    /// Minimum interval between non-forced snapshots.
    pub ui_min_interval: Duration,
    pub connect_timeout: Duration,
    /// Abort when no data arrives for this long.
    pub read_timeout: Duration,
    /// Receive buffer size in bytes.
    pub buffer_size: usize,
}

impl EngineOptions {
    /// Defaults (100 ms, 15 s, 30 s, 8 KiB) writing into `download_dir`.
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            ui_min_interval: DEFAULT_UI_MIN_INTERVAL,
            connect_timeout: Duration::from_secs(15),
            read_timeout: Duration::from_secs(30),
            buffer_size: 8 * 1024,
        }
    }

    pub fn from_config(cfg: &GrabConfig) -> Self {
        Self {
            download_dir: cfg
                .download_dir
                .clone()
                .unwrap_or_else(default_download_dir),
            ui_min_interval: cfg.ui_min_interval(),
            connect_timeout: cfg.connect_timeout(),
            read_timeout: cfg.read_timeout(),
            buffer_size: cfg.buffer_size_bytes,
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::new(default_download_dir())
    }
}

/// App-private downloads area: `~/.local/share/grab/downloads`, or
/// `<tmp>/grab` when the XDG directories cannot be determined.
pub fn default_download_dir() -> PathBuf {
    match xdg::BaseDirectories::with_prefix("grab") {
        Ok(dirs) => dirs.get_data_home().join("downloads"),
        Err(e) => {
            tracing::warn!("no XDG data dir ({}), using temp dir", e);
            std::env::temp_dir().join("grab")
        }
    }
}
