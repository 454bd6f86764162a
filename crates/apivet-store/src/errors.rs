//! Error handling for apivet-store
//!
//! Wraps apivet-core's ApivetError with store-specific helpers.

use std::path::Path;

use apivet_core::errors::ApivetError;

pub use apivet_core::errors::{io_error, Result};

/// Create an error for a filename outside the request convention
pub fn invalid_request_filename(name: impl Into<String>) -> ApivetError {
    ApivetError::InvalidRequestFilename { name: name.into() }
}

/// Create a wire-format parse error
pub fn wire_error(message: impl Into<String>) -> ApivetError {
    ApivetError::Serialization {
        message: message.into(),
    }
}

/// Create a save error for the given fixture name
pub fn save_error(name: impl Into<String>, reason: impl Into<String>) -> ApivetError {
    ApivetError::Save {
        name: name.into(),
        reason: reason.into(),
    }
}

/// Create the error for a version lookup that matched nothing
pub fn no_versions(constraint: &str, dir: &Path) -> ApivetError {
    ApivetError::Config {
        reason: format!(
            "couldn't find versions matching {:?} in {}",
            constraint,
            dir.display()
        ),
    }
}
