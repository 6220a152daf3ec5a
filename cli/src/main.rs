//! # dirlist Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point of the `dirlist` service, a small HTTP server that answers
//! every request with an HTML directory listing for the path named by the
//! `dir` query parameter. This file handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Starting the server and reporting startup errors
//!
//! ## Examples
//!
//! ```bash
//! # Listen on 0.0.0.0:3000
//! dirlist
//!
//! # Loopback only, ephemeral port, debug logging
//! dirlist -vv --host 127.0.0.1 --port 0
//!
//! # Original behaviour: value handed unsanitized to /bin/sh (command injection!)
//! dirlist --mode shell
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod common; // Process execution
mod core; // Errors
mod srv; // HTTP listener, query parsing, rendering, configuration

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "dirlist",
    about = "Serve directory listings over HTTP",
    long_about = "Answers every HTTP request with the output of the listing program for the\n\
                  path given in the `dir` query parameter, wrapped in <pre> tags.",
    version
)]
struct Cli {
    #[command(flatten)]
    srv: srv::SrvArgs,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = srv::handle_srv(cli.srv).await {
        tracing::error!("Server failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
