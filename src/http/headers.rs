//! Header mapping and allow-list filtering.
//!
//! # Responsibilities
//! - Represent header sets exchanged with the event adapter and backends
//! - Filter headers through a case-insensitive allow-list
//! - Provide the fixed cache-disabling header set
//!
//! # Design Decisions
//! - One filter for both directions (inbound → outbound, outbound → caller)
//! - Original header name casing and values are preserved
//! - `BTreeMap` keeps iteration order deterministic for identical input

use std::collections::BTreeMap;

/// Name of the header carrying the originating invocation's id.
pub const X_REQUEST_ID: &str = "X-Request-ID";

/// Header name → value.
pub type Headers = BTreeMap<String, String>;

/// Return the subset of `headers` whose names appear in `allowed`,
/// compared case-insensitively.
pub fn filter_headers(headers: &Headers, allowed: &[String]) -> Headers {
    headers
        .iter()
        .filter(|(name, _)| is_allowed(name, allowed))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// True when `name` is on the allow-list.
pub fn is_allowed(name: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| a.eq_ignore_ascii_case(name))
}

/// Headers that stop any cache between the caller and the proxy from
/// storing a no-op or error response.
pub fn no_caching() -> Headers {
    Headers::from([
        (
            "Cache-Control".to_string(),
            "no-cache, no-store, must-revalidate".to_string(),
        ),
        ("Pragma".to_string(), "no-cache".to_string()),
        ("Expires".to_string(), "0".to_string()),
    ])
}
