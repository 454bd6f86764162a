//! Version directory discovery.
//!
//! Each subdirectory of the test root whose name parses as a semver
//! version (a leading `v` is accepted) is one recorded API version.

use std::fs;
use std::path::{Path, PathBuf};

use apivet_core::version::{parse_version, VersionConstraint};
use semver::Version;
use tracing::debug;

use crate::errors::{io_error, no_versions, Result};

/// Find the version directories under `root` satisfying `constraint`,
/// sorted by version so runs are deterministic.
///
/// Directory names that do not parse as versions are skipped with a
/// debug log. An empty result is an error: a test run against zero
/// versions is a misconfiguration, not a pass.
pub fn find_version_dirs(root: &Path, constraint: &VersionConstraint) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root)
        .map_err(|e| io_error(format!("looking for versions in {}", root.display()), e))?;

    let mut found: Vec<(Version, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| io_error(format!("looking for versions in {}", root.display()), e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let version = match parse_version(name) {
            Ok(v) => v,
            Err(err) => {
                debug!(name = %name, error = %err, "skipping non-version directory");
                continue;
            }
        };
        if !constraint.matches(&version) {
            debug!(name = %name, constraint = %constraint, "version outside constraint");
            continue;
        }
        found.push((version, path));
    }

    if found.is_empty() {
        return Err(no_versions(&constraint.to_string(), root));
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found.into_iter().map(|(_, path)| path).collect())
}
