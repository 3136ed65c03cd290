//! `grab get <url>` – download one file, rendering progress on stderr.

use anyhow::{Context, Result};
use grab_core::config::GrabConfig;
use grab_core::throttle::NotifyThrottle;
use grab_core::{
    DownloadProgress, DownloadService, DownloadStatus, EngineOptions, HttpDownloader, ProgressSink,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

const MIB: f64 = 1_048_576.0;

/// How often the loop checks for a worker that ended without a terminal snapshot.
const WORKER_POLL: Duration = Duration::from_millis(250);

/// Text of the terminal status line for one snapshot.
pub(crate) fn status_line(p: &DownloadProgress) -> String {
    let done_mib = p.downloaded_bytes as f64 / MIB;
    match p.status {
        DownloadStatus::Idle => "waiting for server".to_string(),
        DownloadStatus::Running if p.has_total() => format!(
            "{:.1} / {:.1} MiB ({}%)",
            done_mib,
            p.total_bytes as f64 / MIB,
            p.percent()
        ),
        DownloadStatus::Running => format!("{:.1} MiB", done_mib),
        DownloadStatus::Done => format!("done, {:.1} MiB", p.total_bytes as f64 / MIB),
        DownloadStatus::Error => format!(
            "failed: {}",
            p.error_message.as_deref().unwrap_or("unknown error")
        ),
    }
}

fn render(p: &DownloadProgress) {
    eprint!("\r  {:<60}", status_line(p));
    let _ = std::io::stderr().flush();
}

pub async fn run_get(
    cfg: &GrabConfig,
    url: &str,
    dir: Option<PathBuf>,
    json: bool,
) -> Result<bool> {
    let mut opts = EngineOptions::from_config(cfg);
    if let Some(dir) = dir {
        opts.download_dir = dir;
    }
    tracing::debug!(dir = %opts.download_dir.display(), "download options");

    let sink = ProgressSink::new();
    let service = DownloadService::new(Arc::new(HttpDownloader::new(opts)), sink.clone());
    let mut rx = sink.subscribe();
    let handle = service.start(url)?;
    let cancel = handle.cancel_token();

    let mut notify = NotifyThrottle::new(cfg.notify_min_interval());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(p) = rx.borrow_and_update().clone() else {
                    continue;
                };
                let terminal = p.is_terminal();
                if notify.should_notify(Instant::now(), p.percent(), terminal) {
                    render(&p);
                }
                if terminal {
                    eprintln!();
                    break;
                }
            }
            res = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                res.context("listen for Ctrl-C")?;
                tracing::info!(url, "interrupted, cancelling download");
                cancel.cancel();
            }
            _ = tokio::time::sleep(WORKER_POLL) => {
                if handle.is_finished() {
                    break;
                }
            }
        }
    }

    let last = tokio::task::spawn_blocking(move || handle.join())
        .await
        .context("download task join")??;
    let last = last
        .or_else(|| sink.current_value())
        .context("download produced no result")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&last)?);
    } else if let (true, Some(path)) = (last.is_done(), last.file_path.as_ref()) {
        println!("{}", path.display());
    }
    Ok(last.is_done())
}
