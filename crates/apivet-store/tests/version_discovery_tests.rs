//! Version directory discovery tests.

use std::fs;
use std::path::Path;

use apivet_core::version::VersionConstraint;
use apivet_store::find_version_dirs;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mkdirs(root: &Path, names: &[&str]) {
    for name in names {
        fs::create_dir(root.join(name)).unwrap();
    }
}

fn dir_names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_discovery_sorted_by_version() {
    let root = TempDir::new().unwrap();
    mkdirs(root.path(), &["2.0.0", "1.10.0", "1.2.0"]);

    let constraint = VersionConstraint::parse("*").unwrap();
    let dirs = find_version_dirs(root.path(), &constraint).unwrap();
    assert_eq!(dir_names(&dirs), vec!["1.2.0", "1.10.0", "2.0.0"]);
}

#[test]
fn test_leading_v_and_skipped_junk() {
    let root = TempDir::new().unwrap();
    mkdirs(root.path(), &["v1.0.0", "scratch", "not-a-version"]);
    fs::write(root.path().join("1.5.0"), b"a file, not a dir").unwrap();

    let constraint = VersionConstraint::parse("*").unwrap();
    let dirs = find_version_dirs(root.path(), &constraint).unwrap();
    assert_eq!(dir_names(&dirs), vec!["v1.0.0"]);
}

#[test]
fn test_constraint_filters_versions() {
    let root = TempDir::new().unwrap();
    mkdirs(root.path(), &["1.0.0", "1.9.0", "2.0.0"]);

    let constraint = VersionConstraint::parse(">=1.0.0, <2.0.0").unwrap();
    let dirs = find_version_dirs(root.path(), &constraint).unwrap();
    assert_eq!(dir_names(&dirs), vec!["1.0.0", "1.9.0"]);
}

#[test]
fn test_no_matching_versions_is_an_error() {
    let root = TempDir::new().unwrap();
    mkdirs(root.path(), &["1.0.0"]);

    let constraint = VersionConstraint::parse(">=3.0.0").unwrap();
    let err = find_version_dirs(root.path(), &constraint).unwrap_err();
    assert_eq!(err.code(), "ERR_CONFIG");
}

#[test]
fn test_missing_root_is_io_error() {
    let root = TempDir::new().unwrap();
    let constraint = VersionConstraint::parse("*").unwrap();
    let err = find_version_dirs(&root.path().join("absent"), &constraint).unwrap_err();
    assert_eq!(err.code(), "ERR_IO");
}
