//! Dispatch types and error definitions.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::http::{Headers, ProxyResponse};

/// One request to a single destination.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundCall {
    pub url: String,
    pub method: String,
    pub headers: Headers,
    pub body: Value,
    pub timeout: Duration,
}

/// Outcome of every destination of one invocation, keyed by URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResponseMap {
    entries: BTreeMap<String, ProxyResponse>,
}

impl ResponseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, response: ProxyResponse) {
        self.entries.insert(url.into(), response);
    }

    pub fn get(&self, url: &str) -> Option<&ProxyResponse> {
        self.entries.get(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Failures that abort a whole invocation.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// An outbound call could not be constructed.
    #[error("Could not proxy request to {url}: {reason}")]
    Setup { url: String, reason: String },
}

/// Result type for invocation-level operations.
pub type ProxyResult<T> = Result<T, ProxyError>;
