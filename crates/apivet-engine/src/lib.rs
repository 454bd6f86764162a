//! apivet engine - test orchestration layer
//!
//! Drives a whole compatibility run: version discovery, request replay
//! against target and base hosts, response comparison under the resolved
//! override rules, and optional snapshot recording.

pub mod config;
pub mod fetch;
pub mod runner;

pub use config::{HostConf, RunConfig};
pub use fetch::{decode_body, FetchedResponse};
pub use runner::{run, FixtureOutcome, FixtureReport, RunReport, VersionReport};
