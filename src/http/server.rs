//! Local API Gateway emulator.
//!
//! # Responsibilities
//! - Accept plain HTTP requests during development
//! - Convert each one into an API Gateway event with a fresh request id
//! - Run it through the pipeline as a single invocation
//! - Translate the gateway response back into HTTP
//!
//! # Design Decisions
//! - Goes through the same event adapter as `invoke`, so both paths agree
//! - A status HTTP cannot carry (the `0` sentinel) becomes 502, as the
//!   gateway does for a malformed integration response

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header::HeaderName, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::http::Headers;
use crate::lambda::{
    normalize_incoming_request, response_to_gateway, ApiGatewayProxyEvent,
    ApiGatewayProxyResponse, RequestContext,
};
use crate::multicast::{MulticastProxy, Transport};

/// Application state injected into handlers.
struct AppState<T> {
    proxy: Arc<MulticastProxy<T>>,
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            proxy: self.proxy.clone(),
        }
    }
}

/// HTTP front end for local runs.
pub struct LocalServer {
    router: Router,
}

impl LocalServer {
    pub fn new<T: Transport + 'static>(proxy: Arc<MulticastProxy<T>>) -> Self {
        let router = Router::new()
            .fallback(gateway_handler::<T>)
            .with_state(AppState { proxy })
            .layer(TraceLayer::new_for_http());
        Self { router }
    }

    /// Serve until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Local gateway listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Local gateway stopped");
        Ok(())
    }
}

async fn gateway_handler<T: Transport + 'static>(
    State(state): State<AppState<T>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event = to_event(&method, &uri, &headers, &body);
    let outgoing = state.proxy.handle(normalize_incoming_request(event)).await;
    into_http_response(response_to_gateway(outgoing))
}

/// Build the event API Gateway would have delivered for this request.
pub fn to_event(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: &[u8],
) -> ApiGatewayProxyEvent {
    let mut flat = Headers::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        flat.entry(name.as_str().to_string())
            .and_modify(|existing: &mut String| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    let query: Map<String, Value> = uri
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
                .collect()
        })
        .unwrap_or_default();

    ApiGatewayProxyEvent {
        path: uri.path().to_string(),
        http_method: method.as_str().to_string(),
        headers: Some(flat),
        query_string_parameters: (!query.is_empty()).then_some(query),
        body: (!body.is_empty()).then(|| String::from_utf8_lossy(body).into_owned()),
        is_base64_encoded: false,
        request_context: RequestContext {
            request_id: Uuid::new_v4().to_string(),
        },
    }
}

pub fn into_http_response(gateway: ApiGatewayProxyResponse) -> Response {
    let Some(status) = StatusCode::from_u16(gateway.status_code)
        .ok()
        .filter(|s| s.as_u16() >= 100 && s.as_u16() < 600)
    else {
        tracing::warn!(status = gateway.status_code, "Integration returned an unusable status");
        return (StatusCode::BAD_GATEWAY, "Internal server error").into_response();
    };

    let mut response = Response::new(gateway.body.map_or_else(Body::empty, Body::from));
    *response.status_mut() = status;
    for (name, value) in &gateway.headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping header that is not valid HTTP"),
        }
    }
    response
}
