//! Configuration validation.
//!
//! # Responsibilities
//! - Turn an untyped document into a `MulticastConfig`
//! - Fall back to defaults per field when a value has the wrong shape
//! - Compile rewrite patterns and reject the invalid ones
//!
//! # Design Decisions
//! - Shape errors are lenient (warn + default), regex errors are fatal
//! - Returns all validation errors, not just the first
//! - Runs once, before the config is handed to the pipeline

use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::schema::{LogFormat, LogLevel, MulticastConfig, DEFAULT_TIMEOUT_MS};
use crate::routing::{RewriteConfig, RewriteRule};

/// A semantic problem that prevents the config from being used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid rewrite pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Build a typed configuration from a parsed document.
pub fn validate_config(doc: &Value) -> Result<MulticastConfig, Vec<ValidationError>> {
    let empty = Map::new();
    let fields = match doc {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            tracing::warn!(kind = value_kind(other), "Config is not an object, using defaults");
            &empty
        }
    };

    let mut errors = Vec::new();
    let rewrite_config = match rewrite_entries(fields.get("rewriteConfig")) {
        Some(entries) => compile_rules(entries, &mut errors),
        None => RewriteConfig::default(),
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(MulticastConfig {
        log_level: log_level(fields.get("logLevel")),
        log_format: log_format(fields.get("logFormat")),
        proxy_timeout: proxy_timeout(fields.get("proxyTimeout")),
        rewrite_config,
        proxied_incoming_headers: string_list(
            "proxiedIncomingHeaders",
            fields.get("proxiedIncomingHeaders"),
        ),
        proxied_outgoing_headers: string_list(
            "proxiedOutgoingHeaders",
            fields.get("proxiedOutgoingHeaders"),
        ),
    })
}

fn log_level(value: Option<&Value>) -> LogLevel {
    match value {
        None => LogLevel::default(),
        Some(Value::Null) => LogLevel::Off,
        Some(Value::String(name)) => LogLevel::from_name(name).unwrap_or_else(|| {
            tracing::warn!(log_level = %name, "Unknown logLevel, using default");
            LogLevel::default()
        }),
        Some(other) => {
            tracing::warn!(
                kind = value_kind(other),
                "logLevel must be a string or null, using default"
            );
            LogLevel::default()
        }
    }
}

fn log_format(value: Option<&Value>) -> LogFormat {
    match value.and_then(Value::as_str) {
        None => LogFormat::default(),
        Some("json") => LogFormat::Json,
        Some("pretty") => LogFormat::Pretty,
        Some(other) => {
            tracing::warn!(log_format = %other, "Unknown logFormat, using default");
            LogFormat::default()
        }
    }
}

fn proxy_timeout(value: Option<&Value>) -> Duration {
    let millis = match value {
        None => DEFAULT_TIMEOUT_MS,
        Some(v) => match v.as_u64().filter(|ms| *ms > 0) {
            Some(ms) => ms,
            None => {
                tracing::warn!(
                    proxy_timeout = %v,
                    "proxyTimeout must be a positive integer, using default"
                );
                DEFAULT_TIMEOUT_MS
            }
        },
    };
    Duration::from_millis(millis)
}

fn string_list(field: &str, value: Option<&Value>) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    match as_strings(value) {
        Some(list) => list,
        None => {
            tracing::warn!(field = %field, "Expected an array of strings, using empty list");
            Vec::new()
        }
    }
}

/// Pattern → templates, in document order. `None` when absent or malformed.
fn rewrite_entries(value: Option<&Value>) -> Option<Vec<(&str, Vec<String>)>> {
    let map = match value? {
        Value::Object(map) => map,
        other => {
            tracing::warn!(
                kind = value_kind(other),
                "rewriteConfig must be an object, ignoring it"
            );
            return None;
        }
    };
    let mut entries = Vec::with_capacity(map.len());
    for (pattern, templates) in map {
        match as_strings(templates) {
            Some(list) => entries.push((pattern.as_str(), list)),
            None => {
                tracing::warn!(
                    pattern = %pattern,
                    "rewriteConfig entries must be arrays of strings, ignoring rewriteConfig"
                );
                return None;
            }
        }
    }
    Some(entries)
}

fn compile_rules(
    entries: Vec<(&str, Vec<String>)>,
    errors: &mut Vec<ValidationError>,
) -> RewriteConfig {
    let rules = entries
        .into_iter()
        .filter_map(|(pattern, templates)| match RewriteRule::new(pattern, &templates) {
            Ok(rule) => Some(rule),
            Err(e) => {
                errors.push(ValidationError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                });
                None
            }
        })
        .collect();
    RewriteConfig::new(rules)
}

fn as_strings(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
