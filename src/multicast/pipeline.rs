//! One invocation, end to end.
//!
//! `Received → Rewritten → Dispatched → Selected → Returned`. Any
//! invocation-level error short-circuits to a bodiless 500.

use std::sync::Arc;

use tracing::Instrument;

use crate::config::MulticastConfig;
use crate::http::{IncomingRequest, OutgoingResponse};
use crate::multicast::dispatcher::Dispatcher;
use crate::multicast::selector::select_response;
use crate::multicast::transport::{HttpTransport, Transport};
use crate::observability::{logging, metrics};

/// The rewrite → dispatch → select pipeline bound to one configuration.
#[derive(Debug)]
pub struct MulticastProxy<T> {
    config: Arc<MulticastConfig>,
    dispatcher: Dispatcher<T>,
}

impl MulticastProxy<HttpTransport> {
    /// Pipeline backed by a real HTTP client.
    pub fn from_config(config: Arc<MulticastConfig>) -> Result<Self, reqwest::Error> {
        Ok(Self::new(config, HttpTransport::new()?))
    }
}

impl<T: Transport> MulticastProxy<T> {
    pub fn new(config: Arc<MulticastConfig>, transport: T) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::new(transport),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    /// Handle one inbound request. Never fails: errors become a 500.
    pub async fn handle(&self, request: IncomingRequest) -> OutgoingResponse {
        let span = tracing::info_span!("invocation", request_id = %request.id);
        self.run(&request).instrument(span).await
    }

    async fn run(&self, request: &IncomingRequest) -> OutgoingResponse {
        tracing::debug!(request = ?request, "Incoming request");

        let urls = self.config.rewrite_config.rewrite(&request.path);
        let dispatched = self
            .dispatcher
            .dispatch(
                request,
                &urls,
                &self.config.proxied_incoming_headers,
                self.config.proxy_timeout,
            )
            .await;

        match dispatched {
            Ok(responses) => {
                let outgoing =
                    select_response(&urls, &responses, &self.config.proxied_outgoing_headers);
                logging::log_proxied_request(request, &urls, &responses, Some(&outgoing));
                metrics::record_invocation(if urls.is_empty() { "noop" } else { "proxied" });
                outgoing
            }
            Err(e) => {
                tracing::warn!(error = %e, "Proxying request failed");
                metrics::record_invocation("failed");
                OutgoingResponse::internal_error()
            }
        }
    }
}
