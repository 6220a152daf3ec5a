//! # dirlist Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests: locating the compiled binary,
//! running it as a live server on an ephemeral loopback port, stopping it
//! with SIGTERM, and fetching pages from it with a blocking `reqwest` client.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::io::{BufRead, BufReader};
use std::net::SocketAddr;
use std::path::Path;
use std::process::{Child, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// # Get dirlist Command (`dirlist_cmd`)
///
/// An `assert_cmd::Command` pointing at the `dirlist` binary of this test run.
///
/// ## Panics
/// Panics if the binary cannot be found.
pub fn dirlist_cmd() -> Command {
    Command::cargo_bin("dirlist").expect("Failed to find dirlist binary for testing")
}

/// A running `dirlist` process. Killed and reaped on drop.
pub struct RunningServer {
    child: Child,
    pub addr: SocketAddr,
}

impl RunningServer {
    /// Base URL of the server, e.g. `http://127.0.0.1:40123`.
    pub fn url(&self, target: &str) -> String {
        format!("http://{}{}", self.addr, target)
    }

    /// # Terminate (`terminate`)
    ///
    /// Sends SIGTERM to the server process and waits up to `timeout` for it
    /// to exit.
    ///
    /// ## Returns
    /// * `Some(status)` if the process exited in time, `None` otherwise.
    #[cfg(unix)]
    pub fn terminate(&mut self, timeout: Duration) -> Option<ExitStatus> {
        let pid = libc::pid_t::try_from(self.child.id()).expect("pid fits in pid_t");
        // SAFETY: `pid` is our own, not yet reaped, child process.
        let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
        assert_eq!(rc, 0, "Failed to send SIGTERM to dirlist");

        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(status) = self.child.try_wait().expect("Failed to poll dirlist") {
                return Some(status);
            }
            thread::sleep(Duration::from_millis(25));
        }
        None
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// # Spawn Server (`spawn_server`)
///
/// Starts the binary on `127.0.0.1:0` with `extra_args`. See [`spawn_server_with`].
pub fn spawn_server(extra_args: &[&str]) -> RunningServer {
    spawn_server_with(None, extra_args, &[])
}

/// # Spawn Server With Environment (`spawn_server_with`)
///
/// Starts the binary on `127.0.0.1:0` and waits for the
/// `Listening on http://<addr>` line on stdout.
///
/// ## Arguments
///
/// * `cwd`: Working directory of the server (where `.dirlist.toml` is looked up).
/// * `extra_args`: Additional command-line arguments.
/// * `envs`: Environment variables set for the server process.
///
/// ## Panics
/// Panics if the process cannot be spawned or exits before listening.
pub fn spawn_server_with(
    cwd: Option<&Path>,
    extra_args: &[&str],
    envs: &[(&str, &str)],
) -> RunningServer {
    let binary = assert_cmd::cargo::cargo_bin("dirlist");
    let mut command = std::process::Command::new(binary);
    command
        .args(["--host", "127.0.0.1", "--port", "0"])
        .args(extra_args)
        .env_remove("RUST_LOG")
        .envs(envs.iter().copied())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }
    let mut child = command.spawn().expect("Failed to spawn dirlist");

    let stdout = child.stdout.take().expect("stdout is piped");
    let mut lines = BufReader::new(stdout).lines();
    let addr = loop {
        let line = lines
            .next()
            .expect("dirlist exited before listening")
            .expect("Failed to read dirlist stdout");
        if let Some(addr) = line.strip_prefix("Listening on http://") {
            break addr.trim().parse().expect("Bound address is not a socket address");
        }
    };

    RunningServer { child, addr }
}

/// Response fields the tests assert on.
#[derive(Debug)]
pub struct Page {
    pub status: reqwest::StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

/// # Fetch Page (`fetch`)
///
/// Sends one request with `method` to `url` and reads the full body.
pub fn fetch(method: reqwest::Method, url: &str) -> Page {
    let response = reqwest::blocking::Client::new()
        .request(method, url)
        .send()
        .expect("Request to dirlist failed");

    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = response.text().expect("Failed to read response body");

    Page {
        status,
        content_type,
        body,
    }
}

/// `GET` shorthand for [`fetch`].
pub fn get(url: &str) -> Page {
    fetch(reqwest::Method::GET, url)
}
