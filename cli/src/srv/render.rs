//! # dirlist Response Rendering
//!
//! File: cli/src/srv/render.rs
//!
//! ## Overview
//!
//! Renders the outcome of a listing run as the HTTP response. Every response
//! has status `200 OK` and `Content-Type: text/html`:
//! - success: `<pre>{stdout}</pre>`, with stdout inserted as-is (not HTML-escaped)
//! - any failure: the literal body `Error occurred`
//!
//! Failures are not distinguished from each other in the response.
//!
use crate::common::process::CommandOutput;
use crate::core::error::DirlistError;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Body sent for every failed listing.
pub const ERROR_BODY: &str = "Error occurred";

/// Content type sent with every response.
pub const CONTENT_TYPE_HTML: &str = "text/html";

/// Builds the body for a listing outcome.
pub fn render_body(result: &Result<CommandOutput, DirlistError>) -> String {
    match result {
        Ok(output) => format!("<pre>{}</pre>", output.stdout),
        Err(_) => ERROR_BODY.to_string(),
    }
}

/// # Render Listing (`render_listing`)
///
/// Builds the full response for a listing outcome.
///
/// ## Returns
///
/// * `Response`: Always `200 OK` with `Content-Type: text/html`; the body
///   comes from [`render_body`].
pub fn render_listing(result: &Result<CommandOutput, DirlistError>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, CONTENT_TYPE_HTML)],
        render_body(result),
    )
        .into_response()
}
