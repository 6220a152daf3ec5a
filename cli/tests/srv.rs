//! # dirlist Live Server Integration Tests
//!
//! File: cli/tests/srv.rs
//!
//! ## Overview
//!
//! End-to-end checks against the real binary listening on a loopback port.
//! Unix only, since they rely on `ls`, `/bin/sh` and SIGTERM.
//!
#![cfg(unix)]

mod common;
use common::*;
use reqwest::{Method, StatusCode};
use std::fs;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn fixture(names: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    for name in names {
        fs::write(temp_dir.path().join(name), name).expect("Failed to write fixture");
    }
    temp_dir
}

fn direct_ls(dir: &TempDir) -> String {
    let output = std::process::Command::new("ls")
        .arg(dir.path())
        .output()
        .expect("Failed to run ls");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn injection_target(dir: &TempDir) -> String {
    format!("/?dir={}%3B%20echo%20INJECTED", dir.path().display())
}

#[test]
fn test_listing_over_http() {
    let server = spawn_server(&[]);
    let dir = fixture(&["first.txt", "second.txt"]);

    let page = get(&server.url(&format!("/?dir={}", dir.path().display())));
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.content_type.as_deref(), Some("text/html"));
    assert_eq!(page.body, format!("<pre>{}</pre>", direct_ls(&dir)));
}

#[test]
fn test_nonexistent_directory_over_http() {
    let server = spawn_server(&[]);
    let dir = TempDir::new().expect("Failed to create temp dir");

    let page = get(&server.url(&format!("/?dir={}/absent", dir.path().display())));
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.content_type.as_deref(), Some("text/html"));
    assert_eq!(page.body, "Error occurred");
}

#[test]
fn test_request_without_dir_and_with_other_method() {
    let server = spawn_server(&["--mode", "shell"]);

    for method in [Method::GET, Method::POST] {
        let page = fetch(method, &server.url("/anything"));
        assert_eq!(page.status, StatusCode::OK);
        assert_eq!(page.content_type.as_deref(), Some("text/html"));
        assert!(page.body == "Error occurred" || page.body.starts_with("<pre>"));
    }
}

/// Shell mode executes metacharacters from the query. This is the command
/// injection hazard of that mode, kept for compatibility.
#[test]
fn test_shell_mode_injection_over_http() {
    let server = spawn_server(&["--mode", "shell"]);
    let dir = fixture(&["visible.txt"]);

    let page = get(&server.url(&injection_target(&dir)));
    assert!(page.body.contains("visible.txt"));
    assert!(page.body.contains("\nINJECTED\n"));
}

#[test]
fn test_mode_from_environment_variable() {
    let server = spawn_server_with(None, &[], &[("DIRLIST_MODE", "shell")]);
    let dir = fixture(&["visible.txt"]);

    let page = get(&server.url(&injection_target(&dir)));
    assert!(page.body.contains("\nINJECTED\n"));
}

#[test]
fn test_environment_variable_overrides_config_file() {
    let work_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(work_dir.path().join(".dirlist.toml"), "mode = \"argv\"\n")
        .expect("Failed to write config");
    let dir = fixture(&["visible.txt"]);

    // The file alone keeps argv mode: the whole value is one missing path.
    let server = spawn_server_with(Some(work_dir.path()), &[], &[]);
    assert_eq!(get(&server.url(&injection_target(&dir))).body, "Error occurred");
    drop(server);

    let server = spawn_server_with(Some(work_dir.path()), &[], &[("DIRLIST_MODE", "shell")]);
    assert!(get(&server.url(&injection_target(&dir))).body.contains("\nINJECTED\n"));
}

#[test]
fn test_sigterm_shuts_down_cleanly() {
    let mut server = spawn_server(&[]);

    // A served request means the accept loop (and its signal handlers) is running.
    assert_eq!(get(&server.url("/")).status, StatusCode::OK);

    let status = server
        .terminate(Duration::from_secs(10))
        .expect("dirlist did not exit after SIGTERM");
    assert!(status.success(), "unexpected exit status: {}", status);
}

#[test]
fn test_simultaneous_requests_get_their_own_listing() {
    let server = spawn_server(&[]);
    let dirs: Vec<TempDir> = (0..6)
        .map(|i| fixture(&[&format!("only-in-{}.txt", i)]))
        .collect();

    let handles: Vec<_> = dirs
        .iter()
        .enumerate()
        .map(|(i, dir)| {
            let url = server.url(&format!("/?dir={}", dir.path().display()));
            thread::spawn(move || (i, get(&url)))
        })
        .collect();

    for handle in handles {
        let (i, page) = handle.join().expect("Request thread panicked");
        assert_eq!(page.body, format!("<pre>only-in-{}.txt\n</pre>", i));
    }
}
