//! Test orchestrator.
//!
//! Walks every discovered version directory, replays each recorded
//! request against the target, and compares the answer with the base
//! response under the resolved override rules. Fixture-local failures
//! are reported and never abort the rest of the run.

use std::path::Path;

use tracing::{debug, info, warn};

use apivet_core::errors::{ApivetError, Result};
use apivet_core::headers::{compare_headers, compare_statuses};
use apivet_core::pathconf::resolve;
use apivet_core::diff::compare_bodies;
use apivet_store::wire::{StoredRequest, StoredResponse};
use apivet_store::{find_version_dirs, list_request_files, Saver};

use crate::config::RunConfig;
use crate::fetch::{decode_body, fetch_base, fetch_target, load_request, FetchedResponse};

/// Outcome of one fixture.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureOutcome {
    Passed,
    /// The comparison produced difference lines
    Failed { lines: Vec<String> },
    /// The fixture could not be evaluated at all
    Errored { error: ApivetError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixtureReport {
    /// Request filename, e.g. `get-users_req.txt`
    pub name: String,
    pub outcome: FixtureOutcome,
}

impl FixtureReport {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, FixtureOutcome::Passed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VersionReport {
    /// Version directory name, e.g. `1.2.0`
    pub version: String,
    pub fixtures: Vec<FixtureReport>,
}

impl VersionReport {
    pub fn passed(&self) -> bool {
        self.fixtures.iter().all(FixtureReport::passed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub versions: Vec<VersionReport>,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.versions.iter().all(VersionReport::passed)
    }
}

/// Run the full compatibility check described by `config`.
///
/// # Errors
///
/// Only configuration-level failures surface here: an unreadable test
/// root or no version directory matching the constraint. Everything
/// scoped to one fixture lands in its [`FixtureOutcome`] instead.
pub async fn run(config: &RunConfig) -> Result<RunReport> {
    let version_dirs = find_version_dirs(&config.dir, &config.constraint)?;
    let client = reqwest::Client::new();

    let mut versions = Vec::new();
    for dir in &version_dirs {
        versions.push(run_version(config, &client, dir).await?);
    }
    Ok(RunReport { versions })
}

async fn run_version(
    config: &RunConfig,
    client: &reqwest::Client,
    dir: &Path,
) -> Result<VersionReport> {
    let version = dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    info!(version = %version, "running version");

    let mut fixtures = Vec::new();
    for req_path in list_request_files(dir)? {
        let Some(name) = req_path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let name = name.to_string();
        if !filename_matches(&config.test_files, &name) {
            debug!(fixture = %name, "filtered out");
            continue;
        }

        let outcome = match run_fixture(config, client, &version, &req_path).await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(fixture = %name, error = %error, "fixture errored");
                FixtureOutcome::Errored { error }
            }
        };
        fixtures.push(FixtureReport { name, outcome });
    }

    Ok(VersionReport { version, fixtures })
}

async fn run_fixture(
    config: &RunConfig,
    client: &reqwest::Client,
    version: &str,
    req_path: &Path,
) -> Result<FixtureOutcome> {
    let target_req = load_request(req_path, config.target.pre_process.as_deref()).await?;
    let target = fetch_target(client, &target_req, &config.target).await?;

    let base_req = load_request(req_path, config.base.pre_process.as_deref()).await?;
    let base = fetch_base(client, &base_req, req_path, &config.base).await;

    // The snapshot writer runs while the comparison proceeds; both see
    // the same target body without another network read.
    let save_task = config.save.as_ref().map(|save_dir| {
        let dest = config.dir.join(save_dir);
        let req_path = req_path.to_path_buf();
        let resp = StoredResponse {
            code: target.code,
            reason: target.reason.clone(),
            headers: target.headers.clone(),
            body: target.body.to_vec(),
        };
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut saver = Saver::new(dest, req_path);
            saver.save_request()?;
            saver.save_response(&resp)
        })
    });

    let lines = match &base {
        None => Vec::new(),
        Some(base_resp) => compare_fixture(config, version, &base_req, base_resp, &target)?,
    };

    // The fixture fails when either side fails, but a save failure must
    // not swallow the comparison result.
    let mut save_failure = None;
    if let Some(task) = save_task {
        let joined = task.await.map_err(|e| ApivetError::Internal {
            message: format!("snapshot task failed: {e}"),
        })?;
        if let Err(error) = joined {
            warn!(request = %req_path.display(), error = %error, "snapshot not recorded");
            save_failure = Some(error);
        }
    }

    Ok(match (lines.is_empty(), save_failure) {
        (true, None) => FixtureOutcome::Passed,
        (false, _) => FixtureOutcome::Failed { lines },
        (true, Some(error)) => FixtureOutcome::Errored { error },
    })
}

/// One fixture's difference lines: headers first, then the status pair,
/// then the body diff.
fn compare_fixture(
    config: &RunConfig,
    version: &str,
    req: &StoredRequest,
    base: &FetchedResponse,
    target: &FetchedResponse,
) -> Result<Vec<String>> {
    let rules = resolve(&config.rules, version, &req.method, req.route_path());

    let mut lines = compare_headers(
        &rules.headers.ignore,
        &rules.headers.ignore_content,
        &base.headers,
        &target.headers,
    )?;
    lines.extend(compare_statuses(
        base.code,
        target.code,
        &base.status_line(),
        &target.status_line(),
    ));

    let base_body = decode_body(&base.body)?;
    let target_body = decode_body(&target.body)?;
    lines.extend(compare_bodies(
        &rules.json.ignore,
        &rules.json.ignore_missing,
        rules.ignore_null(),
        &base_body,
        &target_body,
    )?);

    Ok(lines)
}

fn filename_matches(filter: &[String], name: &str) -> bool {
    filter.is_empty() || filter.iter().any(|f| f == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_matches() {
        assert!(filename_matches(&[], "a_req.txt"));
        let filter = vec!["a_req.txt".to_string()];
        assert!(filename_matches(&filter, "a_req.txt"));
        assert!(!filename_matches(&filter, "b_req.txt"));
    }
}
