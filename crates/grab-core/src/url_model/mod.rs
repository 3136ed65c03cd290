//! URL modeling and filename derivation.
//!
//! Derives a safe local filename from the Content-Disposition header, the URL
//! path, and the response MIME type, in that order of preference.

mod content_disposition;
mod path;
mod sanitize;

pub use content_disposition::parse_content_disposition_filename;
pub use path::filename_from_url;
pub use sanitize::sanitize_filename;

use std::time::{SystemTime, UNIX_EPOCH};

/// Extension used when the MIME type is absent or not in the table.
const FALLBACK_EXTENSION: &str = "bin";

/// Longest suffix after the last `.` still treated as an existing extension.
const MAX_EXTENSION_LEN: usize = 6;

/// Derives a safe filename for saving a download.
///
/// Prefers the filename from `content_disposition` (if present and parseable),
/// otherwise the last path segment of `url`, otherwise `download_<epoch millis>`.
/// The candidate is sanitized to `[A-Za-z0-9._-]`; an extension from `mime` is
/// appended unless the name already ends in a 1-6 character extension.
///
/// # Examples
///
/// - `resolve_filename("https://example.com/report.pdf", None, None)` → `"report.pdf"`
/// - `resolve_filename("https://example.com/data", None, Some("image/png"))` → `"data.png"`
pub fn resolve_filename(url: &str, content_disposition: Option<&str>, mime: Option<&str>) -> String {
    let now_millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    resolve_filename_at(url, content_disposition, mime, now_millis)
}

/// Same as [`resolve_filename`] with the clock reading supplied by the caller.
pub fn resolve_filename_at(
    url: &str,
    content_disposition: Option<&str>,
    mime: Option<&str>,
    now_millis: u128,
) -> String {
    let candidate = content_disposition
        .and_then(parse_content_disposition_filename)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| filename_from_url(url))
        .unwrap_or_else(|| format!("download_{now_millis}"));

    let sanitized = sanitize_filename(candidate.trim());
    if has_short_extension(&sanitized) {
        return sanitized;
    }
    format!("{}.{}", sanitized, extension_for_mime(mime))
}

/// True if the suffix after the last `.` is 1-6 characters long.
pub fn has_short_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| (1..=MAX_EXTENSION_LEN).contains(&ext.chars().count()))
        .unwrap_or(false)
}

/// Maps a media type to a file extension; unknown or absent → `bin`.
pub fn extension_for_mime(mime: Option<&str>) -> &'static str {
    let Some(mime) = mime else {
        return FALLBACK_EXTENSION;
    };
    match mime.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "application/pdf" => "pdf",
        "text/plain" => "txt",
        "video/mp4" => "mp4",
        _ => FALLBACK_EXTENSION,
    }
}

/// Media type of a `Content-Type` value with parameters stripped
/// (`text/plain; charset=utf-8` → `text/plain`). `None` when blank.
pub fn media_type(content_type: &str) -> Option<&str> {
    let media = content_type.split(';').next().unwrap_or("").trim();
    if media.is_empty() {
        None
    } else {
        Some(media)
    }
}
