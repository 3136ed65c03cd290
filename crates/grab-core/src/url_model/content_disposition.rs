//! Content-Disposition header parsing (RFC 6266 `filename` and `filename*`).

/// Filename hint carried by a Content-Disposition value, if any.
///
/// Accepts quoted (`filename="a b.pdf"`, backslash escapes honoured), bare
/// token (`filename=a.pdf`) and extended (`filename*=UTF-8''a%20b.pdf`, charset
/// case-insensitive) forms. Every form is percent-decoded as lossy UTF-8 and
/// `filename*` wins over `filename`. Never fails.
pub fn parse_content_disposition_filename(header_value: &str) -> Option<String> {
    let mut filename_from_token: Option<String> = None;

    for param in header_value.split(';') {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();

        if name == "filename*" {
            if let Some(encoded) = strip_utf8_charset(value) {
                let decoded = percent_decode(trim_quotes(encoded));
                let decoded = trim_quotes(&decoded);
                if !decoded.is_empty() {
                    return Some(decoded.to_string());
                }
            }
        }

        if name == "filename" && filename_from_token.is_none() {
            let unquoted = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
                decode_quoted_filename(&value[1..value.len() - 1])
            } else {
                value.to_string()
            };
            let decoded = percent_decode(trim_quotes(&unquoted));
            let decoded = trim_quotes(&decoded);
            if !decoded.is_empty() {
                filename_from_token = Some(decoded.to_string());
            }
        }
    }

    filename_from_token
}

/// Strips the `UTF-8''` charset/language prefix of an extended parameter.
fn strip_utf8_charset(value: &str) -> Option<&str> {
    const PREFIX: &str = "utf-8''";
    let head = value.get(..PREFIX.len())?;
    if head.eq_ignore_ascii_case(PREFIX) {
        Some(&value[PREFIX.len()..])
    } else {
        None
    }
}

fn trim_quotes(s: &str) -> &str {
    s.trim().trim_matches('"').trim()
}

/// Unescapes `\"` and `\\` inside a quoted-string.
fn decode_quoted_filename(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Lossy UTF-8 percent-decode. Malformed escapes are kept verbatim.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
