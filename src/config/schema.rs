//! Configuration schema definitions.
//!
//! This module defines the typed, already-valid configuration the pipeline
//! runs with. Raw documents are turned into it by `validation.rs`.

use std::time::Duration;

use serde::Serialize;

use crate::routing::RewriteConfig;

/// Outbound timeout used when the configuration does not set one.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Root configuration for the multicast proxy.
#[derive(Debug, Clone)]
pub struct MulticastConfig {
    /// Minimum level written to the log.
    pub log_level: LogLevel,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Deadline applied to every outbound call.
    pub proxy_timeout: Duration,

    /// Patterns deciding where each inbound request is replicated to.
    pub rewrite_config: RewriteConfig,

    /// Inbound headers forwarded to every outbound call.
    pub proxied_incoming_headers: Vec<String>,

    /// Primary-response headers returned to the caller.
    pub proxied_outgoing_headers: Vec<String>,
}

impl Default for MulticastConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_format: LogFormat::default(),
            proxy_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            rewrite_config: RewriteConfig::default(),
            proxied_incoming_headers: Vec::new(),
            proxied_outgoing_headers: Vec::new(),
        }
    }
}

/// Log verbosity. `Off` corresponds to `logLevel: null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Parse a configured level name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Off => "off",
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
