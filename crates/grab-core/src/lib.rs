pub mod config;
pub mod logging;

pub mod control;
pub mod downloader;
pub mod error;
pub mod fetch_info;
pub mod progress;
pub mod response;
pub mod service;
pub mod sink;
pub mod throttle;
pub mod url_model;

pub use control::CancelToken;
pub use downloader::{Downloader, EngineOptions, HttpDownloader};
pub use error::DownloadError;
pub use fetch_info::{fetch_info, FileInfo};
pub use progress::{DownloadProgress, DownloadStatus};
pub use service::{DownloadHandle, DownloadService};
pub use sink::ProgressSink;
