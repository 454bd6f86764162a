//! Path-scoped override rules and their resolution.
//!
//! A run is configured by an ordered list of [`PathConf`] rules. For each
//! recorded request, [`resolve`] folds every rule whose path pattern,
//! method, and version constraint all match into one effective rule:
//! list-valued fields accumulate in declaration order, scalar fields take
//! the last matching writer.

use crate::errors::ApivetError;
use crate::pathmatch::match_path;
use crate::version::VersionConstraint;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One override rule, scoped by path pattern, method, and version range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConf {
    /// Request-path glob (`**` allowed); empty matches any path
    pub path: String,
    /// Case-insensitive method filter; empty matches any method
    pub method: String,
    /// Version gate; absent matches every version
    pub versions: Option<VersionConstraint>,
    pub json: JsonRules,
    pub headers: HeaderRules,
}

/// JSON body suppression rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonRules {
    /// Path suffixes ignored entirely
    pub ignore: Vec<String>,
    /// Path suffixes ignored only when the node is missing on the target
    pub ignore_missing: Vec<String>,
    /// Tolerate nodes where either side is literal null
    pub ignore_null: Option<bool>,
}

/// Header suppression rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderRules {
    /// Header-name globs ignored entirely
    pub ignore: Vec<String>,
    /// Header-name globs where presence is required but content may differ
    pub ignore_content: Vec<String>,
}

impl PathConf {
    /// Effective null-tolerance flag.
    pub fn ignore_null(&self) -> bool {
        self.json.ignore_null.unwrap_or(false)
    }
}

/// Fold all rules applying to `(version, method, path)` into one effective
/// rule.
///
/// A rule applies iff its path pattern matches, its method filter is empty
/// or equal (case-insensitive), and its version constraint is absent or
/// satisfied. A rule whose pattern or constraint fails to evaluate is
/// skipped with a warning so one malformed rule cannot abort a run.
pub fn resolve(rules: &[PathConf], version: &str, method: &str, path: &str) -> PathConf {
    let mut merged = PathConf::default();

    for rule in rules {
        match match_path(&rule.path, path) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(err) => {
                warn!(pattern = %rule.path, error = %err, "skipping rule with bad path pattern");
                continue;
            }
        }
        if !rule.method.is_empty() && !rule.method.eq_ignore_ascii_case(method) {
            continue;
        }
        if let Some(constraint) = &rule.versions {
            match constraint.satisfies(version) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    warn!(constraint = %constraint, error = %err, "skipping rule with unevaluable version gate");
                    continue;
                }
            }
        }

        merged.json.ignore.extend(rule.json.ignore.iter().cloned());
        merged
            .json
            .ignore_missing
            .extend(rule.json.ignore_missing.iter().cloned());
        if let Some(flag) = rule.json.ignore_null {
            merged.json.ignore_null = Some(flag);
        }
        merged
            .headers
            .ignore
            .extend(rule.headers.ignore.iter().cloned());
        merged
            .headers
            .ignore_content
            .extend(rule.headers.ignore_content.iter().cloned());
    }

    // The merged rule is anonymous: selectors belong to the inputs.
    merged.path.clear();
    merged.method.clear();
    merged.versions = None;
    merged
}

/// Built-in rule set used when no configuration file is present: ignore
/// connection management, tolerate content drift in headers that change
/// on every response.
pub fn default_rules() -> Vec<PathConf> {
    vec![PathConf {
        path: "**".to_string(),
        headers: HeaderRules {
            ignore: vec!["Connection".to_string()],
            ignore_content: [
                "Age",
                "Content-MD5",
                "Content-Range",
                "Date",
                "Expires",
                "Last-Modified",
                "Public-Key-Pins",
                "Server",
                "Set-Cookie",
                "Etag",
                "Retry-After",
                "X-*",
                "Content-Length",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        },
        ..PathConf::default()
    }]
}

/// Validate that every rule in a loaded configuration can be evaluated.
///
/// Used at load time to surface malformed rules as a warning before any
/// fixture runs; evaluation-time skipping still applies.
pub fn lint(rules: &[PathConf]) -> Vec<ApivetError> {
    let mut problems = Vec::new();
    for rule in rules {
        if let Err(err) = match_path(&rule.path, "/") {
            problems.push(err);
        }
    }
    problems
}
