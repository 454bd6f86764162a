//! Fixture file naming convention.
//!
//! A fixture is a pair of files inside a version directory:
//! `<name>_req.txt` (or `<name>_req<N>.txt` for variants of the same
//! endpoint) holding a verbatim HTTP/1.1 request, and the matching
//! `<name>_resp[N].txt` holding the reference response.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{invalid_request_filename, io_error, Result};

const REQ_MARKER: &str = "_req";
const EXT: &str = ".txt";

/// Whether `name` follows the `<base>_req[N].txt` request convention.
pub fn is_request_filename(name: &str) -> bool {
    split_request_filename(name).is_some()
}

/// The `_resp[N].txt` filename paired with a request filename.
///
/// The numeric suffix is preserved: `get-foo_req2.txt` →
/// `get-foo_resp2.txt`.
///
/// # Errors
///
/// `InvalidRequestFilename` when `req_name` does not follow the
/// convention.
pub fn response_filename_for(req_name: &str) -> Result<String> {
    let (base, digits) =
        split_request_filename(req_name).ok_or_else(|| invalid_request_filename(req_name))?;
    Ok(format!("{base}_resp{digits}{EXT}"))
}

/// All request files in `dir`, sorted by name.
///
/// Entries that are not regular files or do not follow the naming
/// convention are skipped silently, so a version directory can hold
/// notes or responses without confusing discovery.
pub fn list_request_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| io_error(format!("finding requests in {}", dir.display()), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| io_error(format!("finding requests in {}", dir.display()), e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if is_request_filename(name) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Split `<base>_req<digits>.txt` into `(base, digits)`; `digits` is
/// empty for the bare `_req.txt` form. The last `_req` occurrence wins.
pub(crate) fn split_request_filename(name: &str) -> Option<(&str, &str)> {
    let idx = name.rfind(REQ_MARKER)?;
    let digits = name[idx + REQ_MARKER.len()..].strip_suffix(EXT)?;
    if digits.is_empty() || digits.bytes().all(|b| b.is_ascii_digit()) {
        Some((&name[..idx], digits))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_takes_last_marker() {
        assert_eq!(
            split_request_filename("get_reqs_req2.txt"),
            Some(("get_reqs", "2"))
        );
    }

    #[test]
    fn test_split_rejects_non_numeric_suffix() {
        assert_eq!(split_request_filename("foo_reqX.txt"), None);
        assert_eq!(split_request_filename("foo_req2.json"), None);
    }
}
