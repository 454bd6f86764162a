//! HTTP/1.1 wire-format fixture files.
//!
//! Fixture files hold verbatim HTTP/1.1 serializations: start line,
//! header lines, a blank line, then the body bytes untouched. Parsing
//! is delegated to `httparse`; this module only lifts its output into
//! owned store types.

use apivet_core::headers::Headers;

use crate::errors::{wire_error, Result};

const MAX_HEADERS: usize = 64;

/// A recorded HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRequest {
    pub method: String,
    pub path: String,
    pub headers: Headers,
    pub body: Vec<u8>,
}

/// A recorded HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResponse {
    pub code: u16,
    pub reason: String,
    pub headers: Headers,
    pub body: Vec<u8>,
}

/// Parse a stored request file.
///
/// # Errors
///
/// `Serialization` when the header section is malformed or truncated.
pub fn read_request(bytes: &[u8]) -> Result<StoredRequest> {
    let mut header_buf = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut req = httparse::Request::new(&mut header_buf);
    let status = req
        .parse(bytes)
        .map_err(|e| wire_error(format!("parsing request: {e}")))?;
    let httparse::Status::Complete(header_len) = status else {
        return Err(wire_error("parsing request: truncated header section"));
    };

    Ok(StoredRequest {
        method: req
            .method
            .ok_or_else(|| wire_error("parsing request: missing method"))?
            .to_string(),
        path: req
            .path
            .ok_or_else(|| wire_error("parsing request: missing path"))?
            .to_string(),
        headers: collect_headers(req.headers),
        body: bytes[header_len..].to_vec(),
    })
}

/// Parse a stored response file.
///
/// # Errors
///
/// `Serialization` when the header section is malformed or truncated.
pub fn read_response(bytes: &[u8]) -> Result<StoredResponse> {
    let mut header_buf = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut resp = httparse::Response::new(&mut header_buf);
    let status = resp
        .parse(bytes)
        .map_err(|e| wire_error(format!("parsing response: {e}")))?;
    let httparse::Status::Complete(header_len) = status else {
        return Err(wire_error("parsing response: truncated header section"));
    };

    Ok(StoredResponse {
        code: resp
            .code
            .ok_or_else(|| wire_error("parsing response: missing status code"))?,
        reason: resp.reason.unwrap_or_default().to_string(),
        headers: collect_headers(resp.headers),
        body: bytes[header_len..].to_vec(),
    })
}

/// Serialize a response back to wire format.
///
/// When the response carries a `Content-Length` header its value is
/// rewritten to the actual body length, so a saver can substitute a
/// re-encoded body without desynchronizing the framing.
pub fn write_response(resp: &StoredResponse) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format!("HTTP/1.1 {} {}\r\n", resp.code, resp.reason).as_bytes());
    for (name, value) in resp.headers.iter() {
        if name == "Content-Length" {
            out.extend_from_slice(format!("Content-Length: {}\r\n", resp.body.len()).as_bytes());
        } else {
            out.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
        }
    }
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(&resp.body);
    out
}

impl StoredRequest {
    /// Request path without the query string, as used for rule scoping.
    pub fn route_path(&self) -> &str {
        match self.path.split_once('?') {
            Some((path, _)) => path,
            None => &self.path,
        }
    }
}

impl StoredResponse {
    /// `"200 OK"` form used in status diff lines.
    pub fn status_line(&self) -> String {
        format!("{} {}", self.code, self.reason)
    }
}

fn collect_headers(parsed: &[httparse::Header<'_>]) -> Headers {
    let mut headers = Headers::new();
    for h in parsed {
        headers.insert(h.name, String::from_utf8_lossy(h.value).into_owned());
    }
    headers
}
