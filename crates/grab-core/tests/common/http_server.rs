//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a single static body on every path. Responses can be shaped per
//! server: status code, entity headers, omitted Content-Length, and a body
//! split into chunks with a pause between them, or stalled after a prefix.
//! `GET /redirect/<path>`
//! answers `302 Found` pointing at `/<path>`. Every response closes the
//! connection, so bodies without Content-Length end at EOF.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub status: u16,
    pub send_content_length: bool,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    /// Extra header line sent byte for byte (no CRLF), e.g. non-UTF-8 values.
    pub raw_header: Option<Vec<u8>>,
    /// Number of pieces the body is written in (at least 1).
    pub chunks: usize,
    /// Pause before every chunk after the first.
    pub chunk_delay: Duration,
    /// Send this many body bytes, then go silent for `stall_for` before the rest.
    pub stall_after: Option<usize>,
    pub stall_for: Duration,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            status: 200,
            send_content_length: true,
            content_type: None,
            content_disposition: None,
            raw_header: None,
            chunks: 1,
            chunk_delay: Duration::ZERO,
            stall_after: None,
            stall_for: Duration::ZERO,
        }
    }
}

/// Starts a server in a background thread serving `body`. Returns the base URL
/// (e.g. "http://127.0.0.1:12345"). The server runs until the process exits.
pub fn start(body: Vec<u8>) -> String {
    start_with_options(body, ServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: ServerOptions) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let opts = Arc::clone(&opts);
            thread::spawn(move || handle(stream, &body, &opts));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// A URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/nothing.bin", port)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

fn handle(mut stream: TcpStream, body: &[u8], opts: &ServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_nodelay(true);
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path) = parse_request_line(request);

    if let Some(target) = path.strip_prefix("/redirect/") {
        let response = format!(
            "HTTP/1.1 302 Found\r\nLocation: /{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            target
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let mut head = format!("HTTP/1.1 {} {}\r\n", opts.status, reason(opts.status));
    if opts.send_content_length {
        head.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    if let Some(ct) = &opts.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", ct));
    }
    if let Some(cd) = &opts.content_disposition {
        head.push_str(&format!("Content-Disposition: {}\r\n", cd));
    }
    head.push_str("Connection: close\r\n");
    let mut head = head.into_bytes();
    if let Some(raw) = &opts.raw_header {
        head.extend_from_slice(raw);
        head.extend_from_slice(b"\r\n");
    }
    head.extend_from_slice(b"\r\n");
    if stream.write_all(&head).is_err() {
        return;
    }
    if method.eq_ignore_ascii_case("HEAD") {
        return;
    }

    if let Some(sent) = opts.stall_after {
        let (first, rest) = body.split_at(sent.min(body.len()));
        if stream.write_all(first).is_err() || stream.flush().is_err() {
            return;
        }
        thread::sleep(opts.stall_for);
        let _ = stream.write_all(rest);
        return;
    }

    let chunks = opts.chunks.max(1);
    let chunk_len = body.len().div_ceil(chunks).max(1);
    for (i, chunk) in body.chunks(chunk_len).enumerate() {
        if i > 0 && !opts.chunk_delay.is_zero() {
            thread::sleep(opts.chunk_delay);
        }
        if stream.write_all(chunk).is_err() || stream.flush().is_err() {
            return;
        }
    }
}

/// Returns (method, path) from the request line.
fn parse_request_line(request: &str) -> (&str, &str) {
    let line = request.lines().next().unwrap_or("");
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");
    (method, path)
}
