//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path+query
//!     → rewrite.rs (test every rule, in declaration order)
//!     → matching rules expand their templates against the first match
//!     → Return: ordered outbound URLs (empty = no-op)
//!
//! Rule Compilation (at startup):
//!     rewriteConfig { pattern: [template, ...] }
//!     → compile regex + tokenize templates
//!     → Freeze as immutable RewriteConfig
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - All matching rules fan out; there is no "first rule wins"
//! - Deterministic: same input always yields the same URL list

pub mod rewrite;

pub use rewrite::{RewriteConfig, RewriteRule};
