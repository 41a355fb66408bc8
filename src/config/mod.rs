//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! --config file (JSON/TOML) or LAMBDA_MULTICAST_CONFIG (JSON)
//!     → loader.rs (read & parse into an untyped document)
//!     → validation.rs (lenient shape checks, regex compilation)
//!     → MulticastConfig (validated, immutable)
//!     → shared via Arc with every invocation
//! ```
//!
//! # Design Decisions
//! - Config is loaded once per process and never mutated
//! - All fields have defaults to allow minimal configs
//! - Badly shaped fields fall back to defaults; bad regexes are fatal

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError, CONFIG_ENV_VAR};
pub use schema::{LogFormat, LogLevel, MulticastConfig, DEFAULT_TIMEOUT_MS};
pub use validation::ValidationError;
