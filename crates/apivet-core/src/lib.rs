//! apivet core - contract-verification engine
//!
//! This crate provides the pure algorithms behind apivet's
//! backward-compatibility checks:
//! - Structural diff over JSON-like values with per-node classification
//! - Rule-based pruning that reduces a raw diff to human-relevant lines
//! - End-anchored path-pattern matching with a `**` wildcard
//! - Semver constraint evaluation for version gating
//! - Path-scoped override-rule resolution
//! - Header and status-line comparison
//!
//! Everything here is synchronous and I/O-free; the store and engine
//! crates layer filesystem and network concerns on top.

pub mod diff;
pub mod errors;
pub mod headers;
pub mod logging;
pub mod pathconf;
pub mod pathmatch;
pub mod version;

// Re-export commonly used types
pub use diff::{compare_bodies, diff as diff_values, DiffKind, DiffNode};
pub use errors::{ApivetError, Result};
pub use headers::{compare_headers, compare_statuses, Headers};
pub use pathconf::{default_rules, resolve, PathConf};
pub use pathmatch::{match_any, match_path};
pub use version::{parse_version, VersionConstraint};
