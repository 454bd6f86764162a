//! Fixture naming convention tests.

use std::fs;

use apivet_store::{is_request_filename, list_request_files, response_filename_for};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_request_filename_recognition() {
    assert!(is_request_filename("get-users_req.txt"));
    assert!(is_request_filename("get-users_req0.txt"));
    assert!(is_request_filename("get-users_req12.txt"));
    assert!(is_request_filename("_req.txt"));

    assert!(!is_request_filename("get-users_req.json"));
    assert!(!is_request_filename("get-users_resp.txt"));
    assert!(!is_request_filename("get-users_reqX.txt"));
    assert!(!is_request_filename("get-users_req1x.txt"));
    assert!(!is_request_filename("get-users.txt"));
    assert!(!is_request_filename(""));
}

#[test]
fn test_response_filename_preserves_suffix() {
    assert_eq!(
        response_filename_for("get-users_req.txt").unwrap(),
        "get-users_resp.txt"
    );
    assert_eq!(
        response_filename_for("get-users_req5.txt").unwrap(),
        "get-users_resp5.txt"
    );
}

#[test]
fn test_response_filename_rejects_bad_names() {
    let err = response_filename_for("get-users.txt").unwrap_err();
    assert_eq!(err.code(), "ERR_INVALID_REQUEST_FILENAME");

    let err = response_filename_for("get-users_reqX.txt").unwrap_err();
    assert_eq!(err.code(), "ERR_INVALID_REQUEST_FILENAME");
}

#[test]
fn test_list_request_files_filters_and_sorts() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b_req.txt"), b"GET / HTTP/1.1\r\n\r\n").unwrap();
    fs::write(dir.path().join("a_req1.txt"), b"GET / HTTP/1.1\r\n\r\n").unwrap();
    fs::write(dir.path().join("a_resp1.txt"), b"HTTP/1.1 200 OK\r\n\r\n").unwrap();
    fs::write(dir.path().join("notes.md"), b"scratch").unwrap();
    // A directory named like a request must not be listed.
    fs::create_dir(dir.path().join("c_req.txt")).unwrap();

    let files = list_request_files(dir.path()).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a_req1.txt", "b_req.txt"]);
}

#[test]
fn test_list_request_files_missing_dir_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = list_request_files(&dir.path().join("absent")).unwrap_err();
    assert_eq!(err.code(), "ERR_IO");
}
