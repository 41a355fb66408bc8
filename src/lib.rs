//! Multicast Proxy Library
//!
//! Replicates each inbound request to every URL its rewrite rules produce,
//! returns the first destination's response and lets the rest run as mirrors.

pub mod config;
pub mod http;
pub mod lambda;
pub mod multicast;
pub mod observability;
pub mod routing;

pub use config::MulticastConfig;
pub use http::{IncomingRequest, OutgoingResponse};
pub use multicast::MulticastProxy;
