//! Outbound outcomes and the caller-facing response.
//!
//! # Responsibilities
//! - `ProxyResponse`: what one outbound call produced
//! - `OutgoingResponse`: what the caller receives
//!
//! # Design Decisions
//! - Transport failures are encoded as a sentinel `ProxyResponse` with
//!   status `0`, never as an error value
//! - Invocation-level failures map to a bodiless 500 so no internal detail
//!   reaches the caller

use serde::Serialize;
use serde_json::Value;

use crate::http::headers::{no_caching, Headers};

/// Status recorded for an outbound call that produced no HTTP response.
pub const SENTINEL_STATUS: u16 = 0;

/// Result of one outbound call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status: u16,
    pub status_text: String,
    pub data: Value,
    pub headers: Headers,
}

impl ProxyResponse {
    /// Sentinel for a call that failed below HTTP (timeout, refused, TLS...).
    pub fn failure(status_text: impl Into<String>) -> Self {
        Self {
            status: SENTINEL_STATUS,
            status_text: status_text.into(),
            data: Value::Null,
            headers: Headers::new(),
        }
    }

    /// True when this is a transport-failure sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.status == SENTINEL_STATUS
    }
}

/// Final response handed back to the event adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingResponse {
    pub status_code: u16,
    pub body: Option<String>,
    pub headers: Headers,
    pub is_base64_encoded: bool,
}

impl OutgoingResponse {
    /// Returned when no rewrite rule matched the inbound path.
    pub fn no_op() -> Self {
        Self {
            status_code: 200,
            body: None,
            headers: no_caching(),
            is_base64_encoded: false,
        }
    }

    /// Returned when the invocation as a whole failed.
    pub fn internal_error() -> Self {
        Self {
            status_code: 500,
            body: None,
            headers: no_caching(),
            is_base64_encoded: false,
        }
    }
}
