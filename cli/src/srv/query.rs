//! # dirlist Query Parsing
//!
//! File: cli/src/srv/query.rs
//!
//! Turns the query component of a request target into a name → value map
//! using standard form decoding (`&` pairs, `=` separator, percent escapes,
//! `+` as space). Values are not validated here.
//!
use axum::extract::Query;
use axum::http::Uri;
use std::collections::HashMap;
use tracing::debug;

/// Query parameter naming the directory to list.
pub const DIR_PARAM: &str = "dir";

pub type QueryParams = HashMap<String, String>;

/// # Parse Query (`parse_query`)
///
/// Parses the query of `uri`. A missing or undecodable query yields an
/// empty map rather than an error. For repeated keys the last value wins.
/// Malformed escapes such as `%ZZ` are kept verbatim and invalid UTF-8 is
/// decoded lossily.
///
/// ## Arguments
///
/// * `uri`: The request target as received (path and query).
pub fn parse_query(uri: &Uri) -> QueryParams {
    match Query::<QueryParams>::try_from_uri(uri) {
        Ok(Query(params)) => params,
        Err(e) => {
            debug!("Ignoring undecodable query in {}: {}", uri, e);
            QueryParams::new()
        }
    }
}

/// The raw `dir` value, if the request carried one.
pub fn dir_param(params: &QueryParams) -> Option<&str> {
    params.get(DIR_PARAM).map(String::as_str)
}
