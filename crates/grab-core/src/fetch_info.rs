//! Metadata probe: content type and size without downloading the body.
//!
//! Uses the curl crate (libcurl) with `nobody` so only the response head is
//! transferred.

use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;

use crate::response::HeaderCollector;

/// Probe timeout, used for both connect and the whole request.
const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// What the server says about a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    /// Raw `Content-Type` value, if sent.
    pub content_type: Option<String>,
    /// `Content-Length`, absent when missing or not a non-negative integer.
    pub content_length_bytes: Option<u64>,
}

/// Performs one request for `url` without fetching the body and reports the
/// announced type and length.
///
/// Follows redirects. A final status outside 2xx is an error rather than a
/// `FileInfo` built from the error response's headers, so callers never size
/// a download from an error page. Runs in the current thread; call from `spawn_blocking`
/// if used from async code.
pub fn fetch_info(url: &str) -> Result<FileInfo> {
    let mut headers = HeaderCollector::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).context("invalid URL")?;
    easy.nobody(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(PROBE_TIMEOUT)?;
    easy.timeout(PROBE_TIMEOUT)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            headers.push(data);
            true
        })?;
        transfer.perform().context("metadata request failed")?;
    }

    let mut head = headers.head();
    if head.status.is_none() {
        head.status = easy.response_code().ok().filter(|code| *code != 0);
    }
    let code = head.status.context("no response code")?;
    if !head.is_success() {
        anyhow::bail!("HEAD {} returned HTTP {}", url, code);
    }
    tracing::debug!(url, content_type = ?head.content_type, content_length = ?head.content_length, "probed");

    Ok(FileInfo {
        content_type: head.content_type,
        content_length_bytes: head.content_length,
    })
}
