//! Outbound HTTP transport.
//!
//! # Responsibilities
//! - Send one `OutboundCall` and report what came back
//! - Classify failures: setup (fatal) vs transport (recoverable)
//!
//! # Design Decisions
//! - Trait seam so the dispatcher can be driven by fakes in tests
//! - Any HTTP status is a success at this layer
//! - JSON bodies are decoded, everything else is kept as text

use async_trait::async_trait;
use hyper::ext::ReasonPhrase;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::http::{Headers, ProxyResponse};
use crate::multicast::types::OutboundCall;

/// Why an outbound call produced no HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The call could not be built; nothing was sent.
    #[error("invalid outbound request: {0}")]
    Setup(String),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// Setup failures abort the invocation; everything else is recorded.
    pub fn is_setup(&self) -> bool {
        matches!(self, TransportError::Setup(_))
    }

    /// `statusText` of the sentinel response recorded for this failure.
    pub fn status_text(&self) -> &'static str {
        match self {
            TransportError::Setup(_) => "Invalid Request",
            TransportError::Timeout => "Request Timed Out",
            TransportError::Connect(_) => "Connection Failed",
            TransportError::Request(_) => "Request Failed",
        }
    }
}

/// Sends outbound calls.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, call: &OutboundCall) -> Result<ProxyResponse, TransportError>;
}

/// `reqwest`-backed transport used in production.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, call: &OutboundCall) -> Result<ProxyResponse, TransportError> {
        let method = Method::from_bytes(call.method.as_bytes())
            .map_err(|_| TransportError::Setup(format!("invalid method {:?}", call.method)))?;
        let url = Url::parse(&call.url)
            .map_err(|e| TransportError::Setup(format!("invalid url {:?}: {}", call.url, e)))?;

        let mut request = self
            .client
            .request(method, url)
            .headers(to_header_map(&call.headers)?)
            .timeout(call.timeout);
        request = match &call.body {
            Value::Null => request,
            Value::String(text) => request.body(text.clone()),
            structured => request.body(encode_body(structured)?),
        };

        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        let status_text = reason_phrase(&response);
        let headers = from_header_map(response.headers());
        let is_json = headers
            .iter()
            .any(|(k, v)| k.eq_ignore_ascii_case(CONTENT_TYPE.as_str()) && v.contains("json"));
        let text = response.text().await.map_err(classify)?;

        Ok(ProxyResponse {
            status: status.as_u16(),
            status_text,
            data: decode_body(text, is_json),
            headers,
        })
    }
}

/// Structured bodies go out as JSON text. Only allow-listed headers describe them.
fn encode_body(body: &Value) -> Result<Vec<u8>, TransportError> {
    serde_json::to_vec(body).map_err(|e| TransportError::Setup(format!("unencodable body: {}", e)))
}

/// The phrase the backend sent, or the canonical one when it used that.
fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_builder() {
        TransportError::Setup(e.to_string())
    } else if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}

fn to_header_map(headers: &Headers) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| TransportError::Setup(format!("invalid header name {:?}", name)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| TransportError::Setup(format!("invalid value for header {:?}", name)))?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

/// Collapse a `HeaderMap` into one value per name, repeated values joined by ", ".
fn from_header_map(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    headers
}

fn decode_body(text: String, is_json: bool) -> Value {
    if is_json {
        if let Ok(value) = serde_json::from_str(&text) {
            return value;
        }
    }
    Value::String(text)
}
