use thiserror::Error;

/// Result type alias using ApivetError
pub type Result<T> = std::result::Result<T, ApivetError>;

/// Canonical error taxonomy for apivet operations
///
/// Every error carries enough context to be reported on its own; the
/// orchestrator decides the blast radius. Errors local to one rule or one
/// fixture are reported and skipped, only configuration-time errors abort
/// a whole run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApivetError {
    /// Malformed glob pattern (fatal to the one rule/match being evaluated)
    #[error("invalid pattern: {pattern}")]
    InvalidPattern { pattern: String },

    /// A version string that does not parse as semver
    #[error("invalid version {version:?}: {reason}")]
    InvalidVersion { version: String, reason: String },

    /// A version constraint that does not parse
    #[error("invalid version constraint {constraint:?}: {reason}")]
    InvalidConstraint { constraint: String, reason: String },

    /// Value nesting exceeded the diff engine's recursion guard
    #[error("value nesting exceeds {max} levels at {path:?}")]
    DepthExceeded { path: String, max: usize },

    /// Fixture filename does not follow the `_req[N].txt` convention
    #[error("invalid filename for request: {name}")]
    InvalidRequestFilename { name: String },

    /// Network failure while fetching a target or base response
    #[error("fetching {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Pre-process command exited non-zero or produced unusable output
    #[error("pre-process command failed: {reason}")]
    PreProcess { reason: String },

    /// Configuration error (fatal to the whole run)
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// Failure while persisting a fixture snapshot
    #[error("saving fixture {name}: {reason}")]
    Save { name: String, reason: String },

    /// I/O error with the operation that produced it
    #[error("i/o error in {op}: {message}")]
    Io { op: String, message: String },

    /// JSON or wire-format encoding/decoding error
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ApivetError {
    /// Get the stable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ApivetError::InvalidPattern { .. } => "ERR_INVALID_PATTERN",
            ApivetError::InvalidVersion { .. } => "ERR_INVALID_VERSION",
            ApivetError::InvalidConstraint { .. } => "ERR_INVALID_CONSTRAINT",
            ApivetError::DepthExceeded { .. } => "ERR_DEPTH_EXCEEDED",
            ApivetError::InvalidRequestFilename { .. } => "ERR_INVALID_REQUEST_FILENAME",
            ApivetError::Fetch { .. } => "ERR_FETCH",
            ApivetError::PreProcess { .. } => "ERR_PRE_PROCESS",
            ApivetError::Config { .. } => "ERR_CONFIG",
            ApivetError::Save { .. } => "ERR_SAVE",
            ApivetError::Io { .. } => "ERR_IO",
            ApivetError::Serialization { .. } => "ERR_SERIALIZATION",
            ApivetError::Internal { .. } => "ERR_INTERNAL",
        }
    }
}

/// Create an I/O error with operation context
pub fn io_error(op: impl Into<String>, err: std::io::Error) -> ApivetError {
    ApivetError::Io {
        op: op.into(),
        message: err.to_string(),
    }
}

impl From<serde_json::Error> for ApivetError {
    fn from(err: serde_json::Error) -> Self {
        ApivetError::Serialization {
            message: err.to_string(),
        }
    }
}
