//! HTTP-facing types.
//!
//! # Data Flow
//! ```text
//! event adapter / local server
//!     → request.rs (IncomingRequest)
//!     → headers.rs (allow-list filter, inbound side)
//!     → [multicast pipeline]
//!     → response.rs (ProxyResponse per destination)
//!     → headers.rs (allow-list filter, outbound side)
//!     → response.rs (OutgoingResponse)
//!     → server.rs (local emulator only: back to HTTP)
//! ```

pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use headers::{filter_headers, Headers, X_REQUEST_ID};
pub use request::IncomingRequest;
pub use response::{OutgoingResponse, ProxyResponse, SENTINEL_STATUS};
pub use server::LocalServer;
