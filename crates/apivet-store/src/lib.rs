//! On-disk fixture store for apivet.
//!
//! A test root contains one directory per recorded API version; each
//! version directory contains `_req[N].txt`/`_resp[N].txt` pairs holding
//! verbatim HTTP/1.1 request and response serializations. This crate
//! owns the naming convention, version discovery, the wire format, and
//! the saver that records new snapshots.

pub mod errors;
pub mod fixture;
pub mod saver;
pub mod versions;
pub mod wire;

pub use fixture::{is_request_filename, list_request_files, response_filename_for};
pub use saver::Saver;
pub use versions::find_version_dirs;
pub use wire::{read_request, read_response, write_response, StoredRequest, StoredResponse};
