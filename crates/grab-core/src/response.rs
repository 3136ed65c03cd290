//! Response header collection and parsing shared by the engine and the probe.

/// Accumulates raw header lines from libcurl's header callback. A new status
/// line (`HTTP/...`) starts a new block, so after redirects only the final
/// response's headers remain.
#[derive(Debug, Default, Clone)]
pub struct HeaderCollector {
    lines: Vec<String>,
}

impl HeaderCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw header line as delivered by curl (CRLF included). Lines
    /// that are not UTF-8 are read as ISO-8859-1, so no header is dropped.
    pub fn push(&mut self, data: &[u8]) {
        let decoded = decode_header_line(data);
        let line = decoded.trim_end();
        if line.starts_with("HTTP/") {
            self.lines.clear();
        }
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn head(&self) -> ResponseHead {
        ResponseHead::parse(&self.lines)
    }
}

fn decode_header_line(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(s) => s.to_string(),
        Err(_) => data.iter().map(|&b| char::from(b)).collect(),
    }
}

/// The headers of one response that the downloader cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// Status code from the `HTTP/x y` line.
    pub status: Option<u32>,
    /// `Content-Length`, if present and a non-negative integer.
    pub content_length: Option<u64>,
    /// Raw `Content-Type` value (parameters included).
    pub content_type: Option<String>,
    /// Raw `Content-Disposition` value (filename hint).
    pub content_disposition: Option<String>,
}

impl ResponseHead {
    /// Parse collected header lines. Unknown and malformed lines are skipped.
    pub fn parse(lines: &[String]) -> Self {
        let mut head = ResponseHead::default();

        for line in lines {
            let line = line.trim();
            if line.starts_with("HTTP/") {
                head.status = line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|code| code.parse::<u32>().ok());
                continue;
            }
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                head.content_length = value.parse::<u64>().ok();
            } else if name.eq_ignore_ascii_case("content-type") {
                head.content_type = Some(value.to_string()).filter(|v| !v.is_empty());
            } else if name.eq_ignore_ascii_case("content-disposition") {
                head.content_disposition = Some(value.to_string()).filter(|v| !v.is_empty());
            }
        }

        head
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(200..=299))
    }
}
