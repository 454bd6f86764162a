//! Run configuration.
//!
//! Built once by the CLI and passed by reference through the whole run;
//! nothing here is mutated after construction.

use std::path::PathBuf;

use apivet_core::pathconf::PathConf;
use apivet_core::version::VersionConstraint;

/// Where responses for one side of the comparison come from.
#[derive(Debug, Clone, Default)]
pub struct HostConf {
    /// Host (and optional port) to send live requests to; empty on the
    /// base side means "replay recorded responses from disk"
    pub host: String,
    pub use_https: bool,
    /// Shell command the stored request is piped through before parsing
    pub pre_process: Option<String>,
}

impl HostConf {
    /// Whether this side is backed by a live host.
    pub fn is_live(&self) -> bool {
        !self.host.is_empty()
    }
}

/// Immutable configuration for one test run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Test root holding one directory per recorded version
    pub dir: PathBuf,
    /// Which recorded versions take part in the run
    pub constraint: VersionConstraint,
    pub target: HostConf,
    pub base: HostConf,
    /// Version directory name (under `dir`) to record snapshots into
    pub save: Option<String>,
    /// When non-empty, only fixtures with these filenames run
    pub test_files: Vec<String>,
    pub quiet: bool,
    pub verbose: bool,
    /// Path-scoped override rules, already loaded and linted
    pub rules: Vec<PathConf>,
}
