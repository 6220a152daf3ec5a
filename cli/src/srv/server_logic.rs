//! # dirlist HTTP Server Implementation
//!
//! File: cli/src/srv/server_logic.rs
//!
//! ## Overview
//!
//! This module implements the listener side of the service: it binds the
//! configured address, serves every request (any method, any path) with the
//! listing handler and shuts down gracefully on Ctrl+C or SIGTERM.
//!
//! ## Architecture
//!
//! Each request runs strictly in order:
//! 1. `query::parse_query` extracts the `dir` value from the request target
//! 2. `ListingCommand::run` builds and awaits the child process
//! 3. `render::render_listing` produces the single response
//!
//! Requests share nothing but the immutable command template, so any number
//! of them may be in flight at once. There is no timeout on the child: a
//! hung listing program leaves its request pending.
//!
use super::config::ServerConfig;
use super::{query, render};
use crate::common::process::{ExecMode, ListingCommand};
use crate::core::error::Result;
use anyhow::Context;
use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{error, info, warn, Level};

/// Shared, read-only state handed to every request.
#[derive(Clone)]
struct AppState {
    command: Arc<ListingCommand>,
}

/// # Run HTTP Server (`run_server`)
///
/// Binds a `TcpListener` to `config.addr()`, prints the bound address as
/// `Listening on http://<addr>` and serves until a shutdown signal arrives.
///
/// ## Errors
///
/// Returns an error if binding fails (port in use, permissions) or the
/// server itself fails. Errors on individual connections, including a
/// failed response write, are dropped by the HTTP stack and do not stop
/// the server.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    if config.mode == ExecMode::Shell {
        warn!(
            "Shell mode: the 'dir' parameter is passed unsanitized to {} and clients can run arbitrary commands",
            config.shell.display()
        );
    }

    // A busy port fails startup; there is no fallback port.
    let addr = config.addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;
    let local_addr = listener
        .local_addr()
        .context("Failed to read bound listener address")?;

    let app = create_app(&config);

    info!(
        "Serving '{}' listings in {} mode on {}",
        config.program, config.mode, local_addr
    );
    // Readiness line on stdout; scripts and tests wait for it.
    println!("Listening on http://{}", local_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server shutdown complete.");
    Ok(())
}

/// # Create Axum Application (`create_app`)
///
/// Builds the router. The listing handler is installed as the fallback so
/// that every method and path reaches it.
///
/// ## Arguments
///
/// * `config`: The effective configuration; only the command template is used.
///
/// ## Returns
///
/// * `Router`: Ready to serve, with request/response tracing applied.
pub fn create_app(config: &ServerConfig) -> Router {
    let state = AppState {
        command: Arc::new(config.listing_command()),
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .fallback(handle_listing)
        .with_state(state)
        .layer(ServiceBuilder::new().layer(trace_layer))
}

/// # Handle Listing Request (`handle_listing`)
///
/// Parse → execute → render for one request. Installed as the router
/// fallback, so the method and path are ignored.
///
/// ## Arguments
///
/// * `state`: Shared command template.
/// * `uri`: Request target; only its query is used.
///
/// ## Returns
///
/// * `Response`: Exactly one page, produced after the child has exited.
async fn handle_listing(State(state): State<AppState>, uri: Uri) -> Response {
    // Parse.
    let params = query::parse_query(&uri);
    let dir = query::dir_param(&params);

    // Execute.
    let result = state.command.run(dir).await;
    if let Err(e) = &result {
        // Detail stays in the log; the client only sees the generic body.
        warn!("Listing for dir={:?} failed: {}", dir, e);
    }

    // Render.
    render::render_listing(&result)
}

/// # Handle Shutdown Signal (`shutdown_signal`)
///
/// Resolves on Ctrl+C or (on Unix) SIGTERM. In-flight requests are allowed
/// to finish.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// --- Unit Tests ---
