//! # dirlist Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utilities that are not tied to the HTTP layer. Currently this is
//! the process execution module that builds and runs the listing command.
//!
//! - **`process`**: Builds the listing `Invocation` for a request value and
//!   runs it as a child process, capturing stdout and stderr.
//!
pub mod process;
