//! End-to-end runner tests against a canned local HTTP responder.

use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;

use apivet_core::pathconf::default_rules;
use apivet_core::version::VersionConstraint;
use apivet_engine::{run, FixtureOutcome, HostConf, RunConfig};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Serve canned 200 responses on a loopback port: the request path picks
/// the body. One thread per test, detached; it dies with the process.
fn spawn_responder(body_for: fn(&str) -> String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let host = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let head = String::from_utf8_lossy(&buf);
            let path = head
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or("/")
                .to_string();
            let body = body_for(&path);
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    host
}

fn write_fixture(root: &Path, version: &str, name: &str, path: &str, resp_body: &str) {
    let dir = root.join(version);
    fs::create_dir_all(&dir).unwrap();
    let req = format!("GET {path} HTTP/1.1\r\nHost: recorded.example\r\n\r\n");
    fs::write(dir.join(format!("{name}_req.txt")), req).unwrap();
    let resp = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
        resp_body.len(),
        resp_body
    );
    fs::write(dir.join(format!("{name}_resp.txt")), resp).unwrap();
}

fn config(root: &Path, host: &str) -> RunConfig {
    RunConfig {
        dir: root.to_path_buf(),
        constraint: VersionConstraint::parse("*").unwrap(),
        target: HostConf {
            host: host.to_string(),
            use_https: false,
            pre_process: None,
        },
        base: HostConf::default(),
        save: None,
        test_files: Vec::new(),
        quiet: true,
        verbose: false,
        rules: default_rules(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_excess_field_passes() {
    // The target adds a field; additions are backward compatible.
    let root = TempDir::new().unwrap();
    write_fixture(
        root.path(),
        "1.0.0",
        "get-foo",
        "/api/foo",
        r#"{"Results": [{"Foo": "a", "Bar": 2}]}"#,
    );
    let host = spawn_responder(|_| r#"{"Results": [{"Foo": "a", "Bar": 2}], "Buzz": true}"#.into());

    let report = run(&config(root.path(), &host)).await.unwrap();
    assert!(report.passed());
    assert_eq!(report.versions.len(), 1);
    assert_eq!(report.versions[0].version, "1.0.0");
    assert_eq!(report.versions[0].fixtures[0].outcome, FixtureOutcome::Passed);
}

#[tokio::test]
async fn test_type_change_fails_with_body_lines() {
    // A number turned into a string breaks consumers.
    let root = TempDir::new().unwrap();
    write_fixture(
        root.path(),
        "1.0.0",
        "get-foo",
        "/api/foo",
        r#"{"Results": [{"Foo": "a", "Bar": 2}]}"#,
    );
    let host = spawn_responder(|_| r#"{"Results": [{"Foo": "a", "Bar": "2"}]}"#.into());

    let report = run(&config(root.path(), &host)).await.unwrap();
    assert!(!report.passed());
    let FixtureOutcome::Failed { lines } = &report.versions[0].fixtures[0].outcome else {
        panic!("expected a failed fixture");
    };
    assert_eq!(
        lines,
        &vec![
            "- .Results[0].Bar: 2".to_string(),
            "+ .Results[0].Bar: \"2\"".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_missing_fixture_response_runs_without_base() {
    // No recorded response: nothing to compare against, fixture passes.
    let root = TempDir::new().unwrap();
    let dir = root.path().join("1.0.0");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("get-foo_req.txt"),
        "GET /api/foo HTTP/1.1\r\nHost: recorded.example\r\n\r\n",
    )
    .unwrap();
    let host = spawn_responder(|_| r#"{"anything": true}"#.into());

    let report = run(&config(root.path(), &host)).await.unwrap();
    assert!(report.passed());
}

#[tokio::test]
async fn test_unreachable_target_errors_fixture_not_run() {
    let root = TempDir::new().unwrap();
    write_fixture(root.path(), "1.0.0", "get-foo", "/api/foo", "{}");

    // Reserved port, nothing listens there.
    let report = run(&config(root.path(), "127.0.0.1:1")).await.unwrap();
    assert!(!report.passed());
    let FixtureOutcome::Errored { error } = &report.versions[0].fixtures[0].outcome else {
        panic!("expected an errored fixture");
    };
    assert_eq!(error.code(), "ERR_FETCH");
}

#[tokio::test]
async fn test_no_versions_is_fatal() {
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("not-a-version")).unwrap();
    let err = run(&config(root.path(), "127.0.0.1:1")).await.unwrap_err();
    assert_eq!(err.code(), "ERR_CONFIG");
}

#[tokio::test]
async fn test_file_filter_limits_run() {
    let root = TempDir::new().unwrap();
    write_fixture(root.path(), "1.0.0", "get-foo", "/api/foo", "{}");
    write_fixture(root.path(), "1.0.0", "get-bar", "/api/bar", "{}");
    let host = spawn_responder(|_| "{}".into());

    let mut conf = config(root.path(), &host);
    conf.test_files = vec!["get-foo_req.txt".to_string()];
    let report = run(&conf).await.unwrap();
    assert_eq!(report.versions[0].fixtures.len(), 1);
    assert_eq!(report.versions[0].fixtures[0].name, "get-foo_req.txt");
}

#[tokio::test]
async fn test_save_records_snapshot_under_new_version() {
    let root = TempDir::new().unwrap();
    write_fixture(root.path(), "1.0.0", "get-foo", "/api/foo", "{}");
    let host = spawn_responder(|_| r#"{"fresh": true}"#.into());

    let mut conf = config(root.path(), &host);
    conf.save = Some("1.1.0".to_string());
    let report = run(&conf).await.unwrap();
    assert!(report.passed());

    let saved_dir = root.path().join("1.1.0");
    let req = fs::read_to_string(saved_dir.join("get-foo_req.txt")).unwrap();
    assert!(req.starts_with("GET /api/foo HTTP/1.1"));
    let resp =
        apivet_store::read_response(&fs::read(saved_dir.join("get-foo_resp.txt")).unwrap())
            .unwrap();
    assert_eq!(resp.code, 200);
    assert_eq!(resp.body, br#"{"fresh": true}"#);
}

#[tokio::test]
async fn test_versions_run_in_order() {
    let root = TempDir::new().unwrap();
    write_fixture(root.path(), "1.10.0", "get-foo", "/api/foo", "{}");
    write_fixture(root.path(), "1.2.0", "get-foo", "/api/foo", "{}");
    let host = spawn_responder(|_| "{}".into());

    let report = run(&config(root.path(), &host)).await.unwrap();
    let versions: Vec<_> = report.versions.iter().map(|v| v.version.clone()).collect();
    assert_eq!(versions, vec!["1.2.0", "1.10.0"]);
}
