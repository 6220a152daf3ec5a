//! # dirlist Listing Server
//!
//! File: cli/src/srv/mod.rs
//!
//! ## Overview
//!
//! The HTTP side of the service. Every request goes through the same linear
//! pipeline: the `dir` query parameter is extracted, the configured listing
//! program is run for it, and the outcome is rendered as an HTML page.
//!
//! ## Architecture
//!
//! - `config.rs`: Command-line, environment and file configuration
//! - `query.rs`: Query string parsing
//! - `render.rs`: HTML response rendering
//! - `server_logic.rs`: Listener, router and request handler
//!
//! ## Examples
//!
//! ```bash
//! # Listen on 0.0.0.0:3000 (hardened argv mode)
//! dirlist
//!
//! # Then:
//! curl 'http://localhost:3000/?dir=/var/log'
//! ```
//!
use crate::core::error::Result;
use tracing::info;

pub use config::SrvArgs;

pub mod config;
pub mod query;
pub mod render;
pub mod server_logic;

/// # Handle Server Startup (`handle_srv`)
///
/// Loads the effective configuration and runs the server until shutdown.
pub async fn handle_srv(args: SrvArgs) -> Result<()> {
    info!("Starting with args: {:?}", args);

    let config = config::load_and_merge_config(&args)?;
    info!("Effective server config: {:?}", config);

    server_logic::run_server(config).await
}
