//! Integration tests: the curl engine against a local HTTP server.

mod common;

use common::http_server::{self, ServerOptions};
use grab_core::{
    CancelToken, DownloadProgress, DownloadStatus, Downloader, EngineOptions, HttpDownloader,
};
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn downloader(dir: &Path, ui_min_interval: Duration) -> HttpDownloader {
    let mut opts = EngineOptions::new(dir);
    opts.ui_min_interval = ui_min_interval;
    HttpDownloader::new(opts)
}

fn collect(engine: &HttpDownloader, url: &str) -> Vec<DownloadProgress> {
    let mut seen = Vec::new();
    engine.download(url, &CancelToken::new(), &mut |p| seen.push(p));
    seen
}

fn body(len: usize) -> Vec<u8> {
    (0u8..251).cycle().take(len).collect()
}

fn assert_single_terminal(seen: &[DownloadProgress]) {
    let terminal: Vec<_> = seen.iter().filter(|p| p.is_terminal()).collect();
    assert_eq!(terminal.len(), 1, "exactly one terminal snapshot: {seen:?}");
    assert!(seen.last().unwrap().is_terminal(), "terminal snapshot comes last");
}

#[test]
fn two_chunks_with_gap_emit_start_and_done() {
    let payload = body(10_000);
    let base = http_server::start_with_options(
        payload.clone(),
        ServerOptions {
            chunks: 2,
            chunk_delay: Duration::from_millis(50),
            ..ServerOptions::default()
        },
    );
    let dir = tempdir().unwrap();
    let engine = downloader(dir.path(), Duration::from_millis(100));
    let seen = collect(&engine, &format!("{base}/payload.bin"));

    let path = dir.path().join("payload.bin");
    assert_eq!(seen.first(), Some(&DownloadProgress::running(0, 10_000, &path)));
    assert_eq!(seen.last(), Some(&DownloadProgress::done(10_000, &path)));
    let intermediate = &seen[1..seen.len() - 1];
    assert!(intermediate.len() <= 1, "at most one throttled update: {intermediate:?}");
    for p in intermediate {
        assert_eq!(p.status, DownloadStatus::Running);
        assert_eq!(p.total_bytes, 10_000);
        assert!(p.downloaded_bytes > 0 && p.downloaded_bytes <= 10_000);
    }
    assert_single_terminal(&seen);
    assert_eq!(std::fs::read(&path).unwrap(), payload);
}

#[test]
fn snapshots_are_monotonic_and_bounded_by_total() {
    let payload = body(64 * 1024);
    let base = http_server::start_with_options(
        payload.clone(),
        ServerOptions {
            chunks: 8,
            chunk_delay: Duration::from_millis(5),
            ..ServerOptions::default()
        },
    );
    let dir = tempdir().unwrap();
    let engine = downloader(dir.path(), Duration::ZERO);
    let seen = collect(&engine, &format!("{base}/big.bin"));

    assert!(seen.len() > 2);
    assert!(seen
        .windows(2)
        .all(|w| w[0].downloaded_bytes <= w[1].downloaded_bytes));
    assert!(seen.iter().all(|p| p.downloaded_bytes <= p.total_bytes));
    let done = seen.last().unwrap();
    assert!(done.is_done());
    assert_eq!(done.total_bytes, payload.len() as u64);
    let on_disk = std::fs::metadata(done.file_path.as_ref().unwrap()).unwrap().len();
    assert_eq!(on_disk, done.total_bytes);
}

#[test]
fn not_found_yields_single_error_and_no_file() {
    let base = http_server::start_with_options(
        b"no such thing".to_vec(),
        ServerOptions {
            status: 404,
            ..ServerOptions::default()
        },
    );
    let dir = tempdir().unwrap();
    let engine = downloader(dir.path(), Duration::ZERO);
    let seen = collect(&engine, &format!("{base}/missing.pdf"));

    assert_eq!(seen.len(), 1, "{seen:?}");
    let err = &seen[0];
    assert_eq!(err.status, DownloadStatus::Error);
    assert!(err.error_message.as_deref().unwrap().contains("404"));
    assert_eq!((err.downloaded_bytes, err.total_bytes), (0, 0));
    assert!(!dir.path().join("missing.pdf").exists());
}

#[test]
fn missing_content_length_reports_unknown_total() {
    let payload = body(3_000);
    let base = http_server::start_with_options(
        payload.clone(),
        ServerOptions {
            send_content_length: false,
            chunks: 3,
            chunk_delay: Duration::from_millis(10),
            ..ServerOptions::default()
        },
    );
    let dir = tempdir().unwrap();
    let engine = downloader(dir.path(), Duration::ZERO);
    let seen = collect(&engine, &format!("{base}/stream.log"));

    let (running, terminal) = seen.split_at(seen.len() - 1);
    assert!(!running.is_empty());
    for p in running {
        assert_eq!(p.status, DownloadStatus::Running);
        assert_eq!(p.total_bytes, 0);
        assert!(!p.has_total());
        assert_eq!(p.percent(), 0);
    }
    let done = &terminal[0];
    assert!(done.is_done());
    assert_eq!(done.total_bytes, 3_000);
    assert_eq!(done.downloaded_bytes, 3_000);
    assert_eq!(std::fs::read(dir.path().join("stream.log")).unwrap(), payload);
}

#[test]
fn redirect_and_content_disposition_name_the_file() {
    let payload = body(1_000);
    let base = http_server::start_with_options(
        payload.clone(),
        ServerOptions {
            content_disposition: Some("attachment; filename=\"Quarterly Report.PDF\"".into()),
            content_type: Some("application/pdf".into()),
            ..ServerOptions::default()
        },
    );
    let dir = tempdir().unwrap();
    let engine = downloader(dir.path(), Duration::ZERO);
    let seen = collect(&engine, &format!("{base}/redirect/export"));

    let done = seen.last().unwrap();
    assert!(done.is_done(), "{seen:?}");
    let path = dir.path().join("Quarterly_Report.PDF");
    assert_eq!(done.file_path.as_deref(), Some(path.as_path()));
    assert_eq!(std::fs::read(&path).unwrap(), payload);
}

#[test]
fn mime_type_supplies_missing_extension() {
    let base = http_server::start_with_options(
        body(500),
        ServerOptions {
            content_type: Some("image/png; charset=binary".into()),
            ..ServerOptions::default()
        },
    );
    let dir = tempdir().unwrap();
    let engine = downloader(dir.path(), Duration::ZERO);
    let seen = collect(&engine, &format!("{base}/data"));
    assert!(seen.last().unwrap().is_done());
    assert!(dir.path().join("data.png").exists());
}

#[test]
fn empty_body_is_a_write_failure() {
    let base = http_server::start(Vec::new());
    let dir = tempdir().unwrap();
    let engine = downloader(dir.path(), Duration::ZERO);
    let seen = collect(&engine, &format!("{base}/empty.txt"));

    assert_single_terminal(&seen);
    let err = seen.last().unwrap();
    assert!(err.is_error());
    let message = err.error_message.as_deref().unwrap();
    assert!(message.contains("empty.txt"), "{message}");
    assert!(!seen.iter().any(|p| p.is_done()));
}

#[test]
fn connection_refused_is_a_network_error() {
    let dir = tempdir().unwrap();
    let engine = downloader(dir.path(), Duration::ZERO);
    let seen = collect(&engine, &http_server::refused_url());

    assert_eq!(seen.len(), 1);
    assert!(seen[0].is_error());
    assert!(!seen[0].error_message.as_deref().unwrap().trim().is_empty());
}

#[test]
fn cancel_mid_stream_stops_promptly_and_removes_file() {
    let base = http_server::start_with_options(
        body(20_000),
        ServerOptions {
            chunks: 2,
            chunk_delay: Duration::from_secs(20),
            ..ServerOptions::default()
        },
    );
    let dir = tempdir().unwrap();
    let engine = downloader(dir.path(), Duration::ZERO);
    let cancel = CancelToken::new();
    let mut seen = Vec::new();
    let started = Instant::now();
    engine.download(&format!("{base}/slow.bin"), &cancel, &mut |p| {
        if p.downloaded_bytes > 0 {
            cancel.cancel();
        }
        seen.push(p);
    });

    assert!(started.elapsed() < Duration::from_secs(10), "cancel was not prompt");
    assert_single_terminal(&seen);
    let last = seen.last().unwrap();
    assert_eq!(last.status, DownloadStatus::Error);
    assert_eq!(last.error_message.as_deref(), Some("download cancelled"));
    assert!(!seen.iter().any(|p| p.is_done()));
    assert!(!dir.path().join("slow.bin").exists());
}

#[test]
fn stalled_body_hits_read_timeout() {
    let stall = Duration::from_secs(40);
    let base = http_server::start_with_options(
        body(100),
        ServerOptions {
            stall_after: Some(10),
            stall_for: stall,
            ..ServerOptions::default()
        },
    );
    let dir = tempdir().unwrap();
    let mut opts = EngineOptions::new(dir.path());
    opts.ui_min_interval = Duration::ZERO;
    opts.read_timeout = Duration::from_secs(2);
    let engine = HttpDownloader::new(opts);

    let started = Instant::now();
    let seen = collect(&engine, &format!("{base}/stalled.bin"));

    assert!(
        started.elapsed() < stall / 2,
        "read timeout did not fire: {:?}",
        started.elapsed()
    );
    assert_single_terminal(&seen);
    assert!(!seen.iter().any(|p| p.is_done()));
    let err = seen.last().unwrap();
    assert_eq!(err.status, DownloadStatus::Error);
    assert!(!err.error_message.as_deref().unwrap().trim().is_empty());
    // The partial file is kept and named in the snapshot.
    let path = dir.path().join("stalled.bin");
    assert_eq!(err.file_path.as_deref(), Some(path.as_path()));
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 10);
}

#[test]
fn latin1_content_disposition_names_the_file() {
    let base = http_server::start_with_options(
        body(64),
        ServerOptions {
            content_type: Some("application/pdf".into()),
            raw_header: Some(b"Content-Disposition: attachment; filename=\"caf\xE9 report.pdf\"".to_vec()),
            ..ServerOptions::default()
        },
    );
    let dir = tempdir().unwrap();
    let engine = downloader(dir.path(), Duration::ZERO);
    let seen = collect(&engine, &format!("{base}/export"));

    let path = dir.path().join("caf__report.pdf");
    assert_eq!(seen.last(), Some(&DownloadProgress::done(64, &path)));
    assert!(!dir.path().join("export.pdf").exists());
}

#[test]
fn cancelled_before_start_never_connects() {
    let dir = tempdir().unwrap();
    let engine = downloader(dir.path(), Duration::ZERO);
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut seen = Vec::new();
    engine.download(&http_server::refused_url(), &cancel, &mut |p| seen.push(p));
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].error_message.as_deref(), Some("download cancelled"));
}
