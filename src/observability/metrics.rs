//! Metrics collection and exposition.
//!
//! # Metrics
//! - `multicast_invocations_total` (counter): invocations by outcome
//! - `multicast_outbound_requests_total` (counter): outbound calls by destination, status
//! - `multicast_outbound_duration_seconds` (histogram): outbound latency by destination
//!
//! # Design Decisions
//! - Destination label is the URL host, never the full URL
//! - Status `0` marks a transport failure
//! - Without an installed recorder every call is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use url::Url;

/// Install the Prometheus exporter, serving on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_invocation(outcome: &'static str) {
    counter!("multicast_invocations_total", "outcome" => outcome).increment(1);
}

pub fn record_outbound(url: &str, status: u16, started: Instant) {
    let destination = destination(url);
    counter!(
        "multicast_outbound_requests_total",
        "destination" => destination.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("multicast_outbound_duration_seconds", "destination" => destination)
        .record(started.elapsed().as_secs_f64());
}

fn destination(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}
