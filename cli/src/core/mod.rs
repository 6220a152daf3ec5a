//! # dirlist Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the infrastructure shared by the rest of the
//! service. Today that is only the error taxonomy.
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::error::{DirlistError, Result};
//! ```
//!
pub mod error;
