//! Hosting-platform adapter.
//!
//! # Data Flow
//! ```text
//! API Gateway event (JSON)
//!     → event.rs (deserialize, merge query into path)
//!     → IncomingRequest → [multicast pipeline] → OutgoingResponse
//!     → event.rs (response envelope)
//!     → API Gateway response (JSON)
//! ```
//!
//! # Design Decisions
//! - The pipeline never sees the platform's native shapes
//! - Unknown event fields are ignored

pub mod event;

pub use event::{
    normalize_incoming_request, response_to_gateway, ApiGatewayProxyEvent, ApiGatewayProxyResponse,
    RequestContext,
};
