//! Configuration loading from disk or the environment.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::config::schema::MulticastConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the JSON configuration document.
pub const CONFIG_ENV_VAR: &str = "LAMBDA_MULTICAST_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve the configuration: file when given, else the environment.
pub fn load(path: Option<&Path>) -> Result<MulticastConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => load_from_env(),
    }
}

/// Load and validate configuration from a `.json` or `.toml` file.
pub fn load_config(path: &Path) -> Result<MulticastConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_json(&content)
    } else {
        parse_toml(&content)
    }
}

/// Load from `LAMBDA_MULTICAST_CONFIG`; unset or blank means defaults.
pub fn load_from_env() -> Result<MulticastConfig, ConfigError> {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(raw) if !raw.trim().is_empty() => parse_json(&raw),
        _ => {
            tracing::debug!(var = CONFIG_ENV_VAR, "No configuration provided, using defaults");
            finish(&Value::Null)
        }
    }
}

pub fn parse_json(raw: &str) -> Result<MulticastConfig, ConfigError> {
    let doc: Value = serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
    finish(&doc)
}

pub fn parse_toml(raw: &str) -> Result<MulticastConfig, ConfigError> {
    let doc: Value = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
    finish(&doc)
}

fn finish(doc: &Value) -> Result<MulticastConfig, ConfigError> {
    validate_config(doc).map_err(ConfigError::Validation)
}
