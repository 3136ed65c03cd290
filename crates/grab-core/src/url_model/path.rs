//! Last-path-segment filename hints.

/// Extracts the last path segment of a URL for use as a filename hint.
///
/// Query string and fragment are ignored. A trailing slash yields an empty
/// segment and therefore `None`. Inputs the `url` crate rejects are split by
/// hand so that a scheme-less string still produces a hint.
pub fn filename_from_url(url: &str) -> Option<String> {
    let segment = match url::Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        Err(_) => {
            let without_query = url.split(|c: char| c == '?' || c == '#').next().unwrap_or("");
            without_query.rsplit('/').next().map(str::to_string)
        }
    }?;

    let segment = segment.trim();
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}
