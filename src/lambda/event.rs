//! API Gateway proxy-integration envelopes.
//!
//! These types define the structure of events received and responses sent
//! when the proxy runs behind API Gateway (optionally fronted by CloudFront).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::{Headers, IncomingRequest, OutgoingResponse};

/// Inbound event, restricted to the fields the proxy reads.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyEvent {
    pub path: String,
    pub http_method: String,
    #[serde(default)]
    pub headers: Option<Headers>,
    /// Kept as a JSON object so declaration order survives.
    #[serde(default)]
    pub query_string_parameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    pub request_context: RequestContext,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub request_id: String,
}

/// Response envelope returned to API Gateway.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyResponse {
    pub status_code: u16,
    pub headers: Headers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub is_base64_encoded: bool,
}

/// Flatten an event into the pipeline's request shape.
///
/// Query parameters are merged back into the path as `?k=v&...`.
pub fn normalize_incoming_request(event: ApiGatewayProxyEvent) -> IncomingRequest {
    let mut path = event.path;
    if let Some(params) = event.query_string_parameters.filter(|p| !p.is_empty()) {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in &params {
            match value {
                Value::String(s) => query.append_pair(key, s),
                Value::Null => query.append_pair(key, ""),
                other => query.append_pair(key, &other.to_string()),
            };
        }
        path.push('?');
        path.push_str(&query.finish());
    }

    IncomingRequest {
        id: event.request_context.request_id,
        method: event.http_method,
        path,
        headers: event.headers.unwrap_or_default(),
        body: event.body.map_or(Value::Null, Value::String),
    }
}

pub fn response_to_gateway(response: OutgoingResponse) -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code: response.status_code,
        headers: response.headers,
        body: response.body,
        is_base64_encoded: response.is_base64_encoded,
    }
}
