//! Portable filename sanitization.

/// Replaces every character outside `[A-Za-z0-9._-]` with `_`.
///
/// One replacement per character (no collapsing), case preserved. The result
/// is always ASCII, so it is safe on every filesystem the downloader targets.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
