//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every invocation produces:
//!     → logging.rs (per-destination summary lines, full outcome at debug)
//!     → metrics.rs (invocation and outbound counters, latency)
//!
//! Consumers:
//!     → stderr (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, `serve` mode only)
//! ```
//!
//! # Design Decisions
//! - Purely observational: the pipeline never depends on a log call's outcome
//! - Request ID carried on the invocation span

pub mod logging;
pub mod metrics;
