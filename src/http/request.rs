//! Normalized inbound request.
//!
//! # Responsibilities
//! - Hold the one inbound call an invocation handles
//! - Carry the invocation id used for `X-Request-ID` propagation
//!
//! # Design Decisions
//! - Built once by the event adapter, read-only afterwards
//! - `path` already has the query string merged in
//! - Body is a JSON value: `Null` for none, `String` for raw text,
//!   anything else is sent as structured JSON

use serde::Serialize;
use serde_json::Value;

use crate::http::headers::Headers;

/// One inbound call, as seen by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomingRequest {
    pub id: String,
    pub method: String,
    pub path: String,
    pub headers: Headers,
    pub body: Value,
}

impl IncomingRequest {
    /// Create a request with no headers and no body.
    pub fn new(
        id: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            path: path.into(),
            headers: Headers::new(),
            body: Value::Null,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = body.into();
        self
    }
}
