//! # dirlist Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the service.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `DirlistError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for startup and plumbing code
//!
//! Every `DirlistError` produced while handling a request is collapsed by the
//! request handler into the generic `Error occurred` page. The detail carried
//! by the variants only ever reaches the server-side log.
//!
//! ## Examples
//!
//! ```rust
//! // Executor failures are typed...
//! let output = command.run(dir).await?; // -> std::result::Result<_, DirlistError>
//!
//! // ...while startup code uses anyhow with context.
//! let listener = TcpListener::bind(addr)
//!     .await
//!     .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;
//! ```
//!
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error type for the dirlist service.
#[derive(Error, Debug)]
pub enum DirlistError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Raised by the hardened `argv` mode before anything is spawned.
    #[error("Refused listing argument {value:?}: {reason}")]
    ArgumentRejected { value: String, reason: &'static str },

    #[error("Failed to spawn `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{cmd}` failed with {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
