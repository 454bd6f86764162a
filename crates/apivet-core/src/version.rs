//! Semantic-version constraint evaluation for version directories and rules.

use crate::errors::{ApivetError, Result};
use semver::{Version, VersionReq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A semver range constraint, keeping its source string for display and
/// serialization round-trips.
///
/// The default constraint (`*`) matches every version.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionConstraint {
    req: VersionReq,
    source: String,
}

impl VersionConstraint {
    /// Parse a constraint string (e.g. `*`, `>=1.2.0, <2.0.0`, `0.1.x`).
    ///
    /// # Errors
    ///
    /// `InvalidConstraint` when the string is not valid semver range syntax.
    pub fn parse(s: &str) -> Result<Self> {
        let req = VersionReq::parse(s).map_err(|e| ApivetError::InvalidConstraint {
            constraint: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            req,
            source: s.to_string(),
        })
    }

    /// Check a parsed version against this constraint.
    pub fn matches(&self, version: &Version) -> bool {
        self.req.matches(version)
    }

    /// Check a version *string* against this constraint.
    ///
    /// A malformed version string is a hard error, not a silent mismatch:
    /// admitting or rejecting an unparsable version would be ambiguous.
    ///
    /// # Errors
    ///
    /// `InvalidVersion` when the string does not parse as semver.
    pub fn satisfies(&self, version: &str) -> Result<bool> {
        let v = parse_version(version)?;
        Ok(self.matches(&v))
    }
}

impl Default for VersionConstraint {
    fn default() -> Self {
        Self {
            // `*` is always valid range syntax.
            req: VersionReq::STAR,
            source: "*".to_string(),
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for VersionConstraint {
    type Err = ApivetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for VersionConstraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for VersionConstraint {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        VersionConstraint::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse a version string, accepting the conventional leading `v`.
///
/// # Errors
///
/// `InvalidVersion` when the string does not parse as semver.
pub fn parse_version(s: &str) -> Result<Version> {
    let trimmed = s.strip_prefix('v').or_else(|| s.strip_prefix('V')).unwrap_or(s);
    Version::parse(trimmed).map_err(|e| ApivetError::InvalidVersion {
        version: s.to_string(),
        reason: e.to_string(),
    })
}
