//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber from the configured level and format
//! - Emit the per-invocation summary lines
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level when set
//! - Logs go to stderr; stdout belongs to the `invoke` response

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LogLevel};
use crate::http::{IncomingRequest, OutgoingResponse};
use crate::multicast::ResponseMap;

/// Install the global subscriber.
pub fn init_logging(level: LogLevel, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

/// One line per destination, then the full outcome at debug level.
pub fn log_proxied_request(
    request: &IncomingRequest,
    urls: &[String],
    responses: &ResponseMap,
    outgoing: Option<&OutgoingResponse>,
) {
    if urls.is_empty() {
        tracing::info!("{} {} => NO-OP", request.method, request.path);
    }
    for url in urls {
        if let Some(res) = responses.get(url) {
            let status = if res.is_sentinel() {
                String::new()
            } else {
                res.status.to_string()
            };
            tracing::info!(
                "{} {} => {} => {} {}",
                request.method,
                request.path,
                url,
                status,
                res.status_text
            );
        }
    }

    tracing::debug!(
        incoming = %request.path,
        outgoing = %to_json(responses),
        "Proxied request"
    );
    if let Some(outgoing) = outgoing {
        tracing::debug!(outgoing = %to_json(outgoing), "Outgoing response");
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}
