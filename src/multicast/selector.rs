//! Primary response selection.
//!
//! The first URL the rewrite step produced is the primary destination; every
//! other destination is a mirror whose outcome is only logged.

use serde_json::Value;

use crate::http::headers::filter_headers;
use crate::http::{OutgoingResponse, ProxyResponse};
use crate::multicast::types::ResponseMap;

/// Shape the caller-facing response from the primary destination's outcome.
pub fn select_response(
    urls: &[String],
    responses: &ResponseMap,
    allowed_headers: &[String],
) -> OutgoingResponse {
    let Some(primary) = urls.first() else {
        return OutgoingResponse::no_op();
    };
    match responses.get(primary) {
        Some(response) => to_outgoing(response, allowed_headers),
        None => to_outgoing(&ProxyResponse::failure("No Response Recorded"), allowed_headers),
    }
}

fn to_outgoing(response: &ProxyResponse, allowed_headers: &[String]) -> OutgoingResponse {
    OutgoingResponse {
        status_code: response.status,
        body: serialize_body(&response.data),
        headers: filter_headers(&response.headers, allowed_headers),
        is_base64_encoded: false,
    }
}

/// Text bodies pass through, structured ones are JSON-encoded, null is no body.
pub fn serialize_body(data: &Value) -> Option<String> {
    match data {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        structured => Some(structured.to_string()),
    }
}
