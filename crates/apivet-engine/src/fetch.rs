//! Loading stored requests and capturing responses for comparison.

use std::path::Path;
use std::process::Stdio;

use bytes::Bytes;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use apivet_core::errors::{io_error, ApivetError, Result};
use apivet_core::headers::Headers;
use apivet_store::fixture::response_filename_for;
use apivet_store::wire::{read_request, read_response, StoredRequest};

use crate::config::HostConf;

/// A response captured for comparison, from the network or from disk.
///
/// The body stays raw `Bytes` so the snapshot writer and the comparator
/// can share one network read without copying.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub code: u16,
    pub reason: String,
    pub headers: Headers,
    pub body: Bytes,
}

impl FetchedResponse {
    /// `"200 OK"` form used in status diff lines.
    pub fn status_line(&self) -> String {
        format!("{} {}", self.code, self.reason)
    }
}

/// Read and parse a stored request, optionally piping the raw bytes
/// through a shell command first.
///
/// The pre-process hook lets a run inject fresh credentials or rewrite
/// hosts without editing recorded fixtures.
///
/// # Errors
///
/// `Io` when the file cannot be read, `PreProcess` when the command
/// fails, `Serialization` when the (processed) bytes do not parse.
pub async fn load_request(path: &Path, pre_process: Option<&str>) -> Result<StoredRequest> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| io_error(format!("reading request {}", path.display()), e))?;
    let raw = match pre_process {
        None => raw,
        Some(command) => pre_process_request(command, raw).await?,
    };
    read_request(&raw)
}

async fn pre_process_request(command: &str, input: Vec<u8>) -> Result<Vec<u8>> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ApivetError::PreProcess {
            reason: format!("spawning {command:?}: {e}"),
        })?;

    let mut stdin = child.stdin.take().ok_or_else(|| ApivetError::PreProcess {
        reason: "child stdin unavailable".to_string(),
    })?;
    // Feed stdin from a separate task so a command that writes before
    // draining its input cannot deadlock the pipe pair. A broken pipe
    // just means the command ignored its input.
    let writer = tokio::spawn(async move {
        let _ = stdin.write_all(&input).await;
    });

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| ApivetError::PreProcess {
            reason: format!("waiting for {command:?}: {e}"),
        })?;
    let _ = writer.await;

    if !output.status.success() {
        return Err(ApivetError::PreProcess {
            reason: format!("{command:?} exited with {}", output.status),
        });
    }
    Ok(output.stdout)
}

/// Send a stored request to a live host and capture the response.
///
/// The recorded request keeps its original path and body; only the
/// scheme and host are rewritten. `Host` and `Content-Length` headers
/// are left for the client to supply.
pub async fn fetch_target(
    client: &reqwest::Client,
    req: &StoredRequest,
    host: &HostConf,
) -> Result<FetchedResponse> {
    let scheme = if host.use_https { "https" } else { "http" };
    let url = format!("{scheme}://{}{}", host.host, req.path);
    let method =
        reqwest::Method::from_bytes(req.method.as_bytes()).map_err(|e| ApivetError::Fetch {
            url: url.clone(),
            reason: format!("invalid method {:?}: {e}", req.method),
        })?;

    let mut builder = client.request(method, &url);
    for (name, value) in req.headers.iter() {
        if name == "Host" || name == "Content-Length" {
            continue;
        }
        builder = builder.header(name, value);
    }
    if !req.body.is_empty() {
        builder = builder.body(req.body.clone());
    }

    let resp = builder.send().await.map_err(|e| ApivetError::Fetch {
        url: url.clone(),
        reason: e.to_string(),
    })?;
    let code = resp.status().as_u16();
    let reason = resp
        .status()
        .canonical_reason()
        .unwrap_or_default()
        .to_string();
    let headers: Headers = resp
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = resp.bytes().await.map_err(|e| ApivetError::Fetch {
        url,
        reason: e.to_string(),
    })?;

    Ok(FetchedResponse {
        code,
        reason,
        headers,
        body,
    })
}

/// Capture the base response: from the base host when one is configured,
/// otherwise from the recorded `_resp` file next to the request.
///
/// Every failure on this side degrades to `None`: a fixture without a
/// usable reference still runs (and can still be snapshotted), it just
/// has nothing to compare against.
pub async fn fetch_base(
    client: &reqwest::Client,
    req: &StoredRequest,
    req_path: &Path,
    host: &HostConf,
) -> Option<FetchedResponse> {
    if host.is_live() {
        return match fetch_target(client, req, host).await {
            Ok(resp) => Some(resp),
            Err(err) => {
                warn!(request = %req_path.display(), error = %err, "base fetch failed, nothing to compare against");
                None
            }
        };
    }
    read_base_file(req_path).await
}

async fn read_base_file(req_path: &Path) -> Option<FetchedResponse> {
    let name = req_path.file_name()?.to_str()?;
    let resp_name = match response_filename_for(name) {
        Ok(resp_name) => resp_name,
        Err(err) => {
            warn!(request = %req_path.display(), error = %err, "cannot derive response filename");
            return None;
        }
    };
    let path = req_path.with_file_name(resp_name);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(response = %path.display(), "no recorded base response");
            return None;
        }
        Err(err) => {
            warn!(response = %path.display(), error = %err, "cannot read recorded base response");
            return None;
        }
    };
    match read_response(&bytes) {
        Ok(resp) => Some(FetchedResponse {
            code: resp.code,
            reason: resp.reason,
            headers: resp.headers,
            body: Bytes::from(resp.body),
        }),
        Err(err) => {
            warn!(response = %path.display(), error = %err, "cannot parse recorded base response");
            None
        }
    }
}

/// Decode a response body for structural comparison.
///
/// An empty (or whitespace-only) body decodes to `Null`; a single JSON
/// value decodes to itself; a concatenated stream of values
/// (`{"a":1}{"b":2}`) decodes to an array of the values in order.
///
/// # Errors
///
/// `Serialization` when the body is not valid JSON.
pub fn decode_body(bytes: &[u8]) -> Result<Value> {
    let mut stream = serde_json::Deserializer::from_slice(bytes).into_iter::<Value>();
    let first = match stream.next() {
        None => return Ok(Value::Null),
        Some(value) => value?,
    };
    let mut values = vec![first];
    for item in stream {
        values.push(item?);
    }
    if values.len() == 1 {
        Ok(values.pop().unwrap_or(Value::Null))
    } else {
        Ok(Value::Array(values))
    }
}
