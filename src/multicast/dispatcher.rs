//! Concurrent fan-out of one inbound request.
//!
//! # Responsibilities
//! - Build one `OutboundCall` per distinct URL
//! - Issue all calls at once and wait for every one of them
//! - Enforce the per-call deadline
//! - Turn transport failures into sentinel responses
//!
//! # Design Decisions
//! - Join, not race: no result is dropped because another finished first
//! - A failing destination never affects its siblings
//! - Only setup failures (bad URL, unsendable header) fail the dispatch
//! - Duplicate URLs are sent once; the map has one entry per URL anyway

use std::collections::HashSet;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use url::Url;

use crate::http::headers::{filter_headers, X_REQUEST_ID};
use crate::http::{Headers, IncomingRequest, ProxyResponse};
use crate::multicast::transport::{Transport, TransportError};
use crate::multicast::types::{OutboundCall, ProxyError, ProxyResult, ResponseMap};
use crate::observability::metrics;

/// Fans a request out over a `Transport`.
#[derive(Debug, Clone)]
pub struct Dispatcher<T> {
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` to every URL in `urls` and collect the outcomes.
    pub async fn dispatch(
        &self,
        request: &IncomingRequest,
        urls: &[String],
        allowed_headers: &[String],
        timeout: Duration,
    ) -> ProxyResult<ResponseMap> {
        let mut seen = HashSet::new();
        let mut calls = Vec::with_capacity(urls.len());
        for url in urls.iter().filter(|url| seen.insert(url.as_str())) {
            Url::parse(url).map_err(|e| ProxyError::Setup {
                url: url.clone(),
                reason: e.to_string(),
            })?;
            calls.push(outbound_call(request, url, allowed_headers, timeout));
        }

        let outcomes = join_all(calls.iter().map(|call| self.send(call))).await;

        let mut responses = ResponseMap::new();
        let mut setup_error = None;
        for (call, outcome) in calls.into_iter().zip(outcomes) {
            match outcome {
                Ok(response) => responses.insert(call.url, response),
                Err(e) => {
                    setup_error.get_or_insert(ProxyError::Setup {
                        url: call.url,
                        reason: e.to_string(),
                    });
                }
            }
        }
        match setup_error {
            Some(e) => Err(e),
            None => Ok(responses),
        }
    }

    /// One call, bounded by its deadline. `Err` only for setup failures.
    async fn send(&self, call: &OutboundCall) -> Result<ProxyResponse, TransportError> {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(call.timeout, self.transport.send(call)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout),
        };

        match outcome {
            Ok(response) => {
                tracing::debug!(
                    url = %call.url,
                    status = response.status,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Outbound request completed"
                );
                metrics::record_outbound(&call.url, response.status, started);
                Ok(response)
            }
            Err(e) if e.is_setup() => Err(e),
            Err(e) => {
                tracing::warn!(url = %call.url, error = %e, "Outbound request failed");
                let response = ProxyResponse::failure(e.status_text());
                metrics::record_outbound(&call.url, response.status, started);
                Ok(response)
            }
        }
    }
}

/// Build the call sent to `url` on behalf of `request`.
pub fn outbound_call(
    request: &IncomingRequest,
    url: &str,
    allowed_headers: &[String],
    timeout: Duration,
) -> OutboundCall {
    OutboundCall {
        url: url.to_string(),
        method: request.method.clone(),
        headers: outbound_headers(request, allowed_headers),
        body: request.body.clone(),
        timeout,
    }
}

/// Allowed inbound headers plus `X-Request-ID`, which is always sent.
///
/// An inbound `x-request-id` that passes the allow-list keeps its value.
fn outbound_headers(request: &IncomingRequest, allowed_headers: &[String]) -> Headers {
    let mut headers = filter_headers(&request.headers, allowed_headers);
    if !headers.keys().any(|k| k.eq_ignore_ascii_case(X_REQUEST_ID)) {
        headers.insert(X_REQUEST_ID.to_string(), request.id.clone());
    }
    headers
}
