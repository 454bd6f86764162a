//! Override-rule configuration files.
//!
//! The format follows the file extension: a JSON file is a bare list of
//! rules, while YAML and TOML files wrap the list in a top-level `conf`
//! key. A missing file falls back to the built-in defaults.

use std::path::Path;

use apivet_core::errors::{ApivetError, Result};
use apivet_core::pathconf::{default_rules, lint, PathConf};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct WrappedConf {
    #[serde(default)]
    conf: Vec<PathConf>,
}

/// Load override rules from `path`.
///
/// # Errors
///
/// `Config` when the file exists but cannot be read or parsed, or when
/// its extension is not one of `json`, `yaml`, `yml`, `toml`.
pub fn load_path_conf(path: &Path) -> Result<Vec<PathConf>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(default_rules()),
        Err(err) => {
            return Err(ApivetError::Config {
                reason: format!("reading {}: {err}", path.display()),
            })
        }
    };

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let rules = match ext {
        "json" => {
            serde_json::from_str::<Vec<PathConf>>(&content).map_err(|e| parse_error(path, e))?
        }
        "yaml" | "yml" => serde_yaml::from_str::<WrappedConf>(&content)
            .map_err(|e| parse_error(path, e))?
            .conf,
        "toml" => toml::from_str::<WrappedConf>(&content)
            .map_err(|e| parse_error(path, e))?
            .conf,
        _ => {
            return Err(ApivetError::Config {
                reason: format!(
                    "invalid configuration format {:?}: supported formats are json, yaml and toml",
                    path.display()
                ),
            })
        }
    };

    // Rules with broken patterns still load; resolution skips them per
    // request, this just surfaces the problem once up front.
    for problem in lint(&rules) {
        warn!(file = %path.display(), error = %problem, "configuration rule cannot be evaluated");
    }

    if rules.is_empty() {
        return Ok(default_rules());
    }
    Ok(rules)
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> ApivetError {
    ApivetError::Config {
        reason: format!("parsing configuration file {}: {err}", path.display()),
    }
}
