//! Snapshot saver: records a request/response pair under a destination
//! version directory.
//!
//! Saving is idempotent per request content: if the destination already
//! holds a byte-identical variant of the request the existing variant is
//! reused, otherwise the request is copied under the next free numeric
//! suffix (`_req.txt`, `_req0.txt`, `_req1.txt`, ...). The response is
//! then written under the matching `_resp` name.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{invalid_request_filename, io_error, save_error, Result};
use crate::fixture::split_request_filename;
use crate::wire::{write_response, StoredResponse};

/// Writes one fixture pair into a destination version directory.
pub struct Saver {
    dest_dir: PathBuf,
    req_path: PathBuf,
    saved_name: Option<String>,
}

impl Saver {
    pub fn new(dest_dir: impl Into<PathBuf>, req_path: impl Into<PathBuf>) -> Self {
        Saver {
            dest_dir: dest_dir.into(),
            req_path: req_path.into(),
            saved_name: None,
        }
    }

    /// Copy the request file into the destination directory.
    ///
    /// Scans the existing variants of the same fixture base name: a
    /// byte-identical one is reused without writing, otherwise the
    /// content lands under the first unused suffix.
    ///
    /// # Errors
    ///
    /// `InvalidRequestFilename` when the source filename does not follow
    /// the request convention, `Io` on read/write failures.
    pub fn save_request(&mut self) -> Result<()> {
        let name = self
            .req_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| invalid_request_filename(self.req_path.display().to_string()))?;
        let (base, _) =
            split_request_filename(name).ok_or_else(|| invalid_request_filename(name))?;
        let content = fs::read(&self.req_path)
            .map_err(|e| io_error(format!("reading request {}", self.req_path.display()), e))?;

        for index in 0.. {
            let candidate = variant_name(base, index);
            let path = self.dest_dir.join(&candidate);
            match fs::read(&path) {
                Ok(existing) if existing == content => {
                    self.saved_name = Some(candidate);
                    return Ok(());
                }
                Ok(_) => continue,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    atomic_write(&path, &content)?;
                    self.saved_name = Some(candidate);
                    return Ok(());
                }
                Err(err) => {
                    return Err(io_error(format!("reading variant {}", path.display()), err))
                }
            }
        }
        Err(save_error(name, "no free variant suffix"))
    }

    /// Write the response paired with the saved request variant.
    ///
    /// # Errors
    ///
    /// `Save` when called before a successful [`Saver::save_request`],
    /// `Io` on write failures.
    pub fn save_response(&self, resp: &StoredResponse) -> Result<()> {
        let Some(req_name) = &self.saved_name else {
            return Err(save_error(
                self.req_path.display().to_string(),
                "response saved before request",
            ));
        };
        let resp_name = crate::fixture::response_filename_for(req_name)?;
        atomic_write(&self.dest_dir.join(resp_name), &write_response(resp))
    }

    /// Variant name chosen by the last successful [`Saver::save_request`].
    pub fn saved_name(&self) -> Option<&str> {
        self.saved_name.as_deref()
    }
}

// Variants run bare-then-numbered-from-zero: `_req.txt`, `_req0.txt`,
// `_req1.txt`, ...
fn variant_name(base: &str, index: usize) -> String {
    if index == 0 {
        format!("{base}_req.txt")
    } else {
        format!("{base}_req{}.txt", index - 1)
    }
}

/// Temp-then-rename write so a crashed run never leaves a partial
/// fixture behind.
fn atomic_write(target: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("creating version directory", e))?;
    }
    let temp_path = target.with_extension("tmp");
    fs::write(&temp_path, content)
        .map_err(|e| io_error(format!("writing {}", temp_path.display()), e))?;
    fs::rename(&temp_path, target)
        .map_err(|e| io_error(format!("renaming into {}", target.display()), e))?;
    Ok(())
}
