//! Multicast subsystem.
//!
//! # Data Flow
//! ```text
//! IncomingRequest
//!     → pipeline.rs (rewrite path into outbound URLs)
//!     → dispatcher.rs (one OutboundCall per URL, all in parallel, joined)
//!         → transport.rs (HTTP, or a fake in tests)
//!     → ResponseMap (URL → ProxyResponse, sentinel on transport failure)
//!     → selector.rs (primary = first URL; filter headers, serialize body)
//!     → OutgoingResponse
//! ```
//!
//! # Design Decisions
//! - No shared mutable state between outbound calls
//! - No retries and no cancellation once dispatched
//! - Mirrors are never promoted to primary

pub mod dispatcher;
pub mod pipeline;
pub mod selector;
pub mod transport;
pub mod types;

pub use dispatcher::Dispatcher;
pub use pipeline::MulticastProxy;
pub use selector::select_response;
pub use transport::{HttpTransport, Transport, TransportError};
pub use types::{OutboundCall, ProxyError, ProxyResult, ResponseMap};
