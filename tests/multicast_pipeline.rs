//! End-to-end multicast tests against real HTTP backends.

use std::sync::Arc;
use std::time::{Duration, Instant};

use multicast_proxy::config::loader::parse_json;
use multicast_proxy::lambda::{
    normalize_incoming_request, response_to_gateway, ApiGatewayProxyEvent,
};
use multicast_proxy::multicast::{Dispatcher, HttpTransport};
use multicast_proxy::{IncomingRequest, MulticastProxy, OutgoingResponse};
use serde_json::json;

mod common;
use common::{closed_port, start_mock_backend, Reply};

fn proxy_for(config: serde_json::Value) -> MulticastProxy<HttpTransport> {
    let config = parse_json(&config.to_string()).unwrap();
    MulticastProxy::from_config(Arc::new(config)).unwrap()
}

#[tokio::test]
async fn test_primary_answers_and_mirror_is_hit() {
    let primary = start_mock_backend(Reply::json(200, r#"{"status":"ok"}"#)).await;
    let mirror = start_mock_backend(Reply::text(404, "not here")).await;

    let proxy = proxy_for(json!({
        "logLevel": null,
        "proxyTimeout": 2000,
        "rewriteConfig": {
            "^/status(.*)": [primary.url("/status$1"), mirror.url("/v2/status$1")]
        },
        "proxiedIncomingHeaders": ["content-type"],
        "proxiedOutgoingHeaders": ["content-type"]
    }));

    let request = IncomingRequest::new("req-42", "POST", "/status?id=1")
        .with_header("Content-Type", "text/plain")
        .with_header("Authorization", "Bearer secret")
        .with_body("ping");
    let out = proxy.handle(request).await;

    assert_eq!(out.status_code, 200);
    assert_eq!(out.body.as_deref(), Some(r#"{"status":"ok"}"#));
    assert_eq!(out.headers.len(), 1);
    assert_eq!(out.headers.get("content-type").map(String::as_str), Some("application/json"));

    let seen = primary.received();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].path, "/status?id=1");
    assert_eq!(seen[0].body, "ping");
    assert_eq!(seen[0].headers.get("x-request-id").map(String::as_str), Some("req-42"));
    assert_eq!(seen[0].headers.get("content-type").map(String::as_str), Some("text/plain"));
    assert!(!seen[0].headers.contains_key("authorization"));

    let mirrored = mirror.received();
    assert_eq!(mirrored.len(), 1);
    assert_eq!(mirrored[0].path, "/v2/status?id=1");
}

#[tokio::test]
async fn test_unreachable_primary_yields_sentinel() {
    let dead = closed_port().await;
    let mirror = start_mock_backend(Reply::text(200, "mirror")).await;

    let proxy = proxy_for(json!({
        "logLevel": null,
        "proxyTimeout": 2000,
        "rewriteConfig": {
            "^/(.*)": [format!("http://{}/$1", dead), mirror.url("/$1")]
        },
        "proxiedOutgoingHeaders": ["content-type"]
    }));

    let out = proxy.handle(IncomingRequest::new("req-1", "GET", "/ping")).await;

    assert_eq!(out.status_code, 0);
    assert_eq!(out.body, None);
    assert!(out.headers.is_empty());
    assert_eq!(mirror.received().len(), 1);
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let slow = start_mock_backend(Reply::text(200, "late").delayed(Duration::from_secs(3))).await;
    let fast = start_mock_backend(Reply::text(200, "fast")).await;

    let proxy = proxy_for(json!({
        "logLevel": null,
        "proxyTimeout": 200,
        "rewriteConfig": {
            "^/(.*)": [fast.url("/$1"), slow.url("/$1")]
        }
    }));

    let started = Instant::now();
    let out = proxy.handle(IncomingRequest::new("req-1", "GET", "/work")).await;

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(out.status_code, 200);
    assert_eq!(out.body.as_deref(), Some("fast"));
    assert_eq!(slow.received().len(), 1);
}

#[tokio::test]
async fn test_unmatched_path_sends_nothing() {
    let backend = start_mock_backend(Reply::text(200, "unused")).await;

    let proxy = proxy_for(json!({
        "logLevel": null,
        "rewriteConfig": { "^/status(.*)": [backend.url("/status$1")] }
    }));

    let out = proxy.handle(IncomingRequest::new("req-1", "GET", "/unknown")).await;

    assert_eq!(out, OutgoingResponse::no_op());
    assert!(backend.received().is_empty());
}

#[tokio::test]
async fn test_gateway_event_round_trip() {
    let backend = start_mock_backend(Reply::json(201, r#"{"created":true}"#)).await;

    let proxy = proxy_for(json!({
        "logLevel": null,
        "rewriteConfig": { "^/items(.*)": [backend.url("/items$1")] },
        "proxiedOutgoingHeaders": ["Content-Type"]
    }));

    let event: ApiGatewayProxyEvent = serde_json::from_value(json!({
        "path": "/items",
        "httpMethod": "PUT",
        "headers": { "Content-Type": "application/json" },
        "queryStringParameters": { "id": "7" },
        "body": "{\"name\":\"x\"}",
        "isBase64Encoded": false,
        "requestContext": { "requestId": "evt-1" }
    }))
    .unwrap();

    let out = proxy.handle(normalize_incoming_request(event)).await;
    let gateway = serde_json::to_value(response_to_gateway(out)).unwrap();

    assert_eq!(gateway["statusCode"], 201);
    assert_eq!(gateway["body"], r#"{"created":true}"#);
    assert_eq!(gateway["headers"]["content-type"], "application/json");
    assert_eq!(gateway["isBase64Encoded"], false);

    let seen = backend.received();
    assert_eq!(seen[0].method, "PUT");
    assert_eq!(seen[0].path, "/items?id=7");
    assert_eq!(seen[0].headers.get("x-request-id").map(String::as_str), Some("evt-1"));
}

#[tokio::test]
async fn test_structured_body_adds_no_headers() {
    let backend = start_mock_backend(Reply::text(200, "ok")).await;
    let dispatcher = Dispatcher::new(HttpTransport::new().unwrap());

    let request = IncomingRequest::new("req-7", "POST", "/items").with_body(json!({ "a": 1 }));
    let urls = vec![backend.url("/items")];
    dispatcher
        .dispatch(&request, &urls, &[], Duration::from_secs(2))
        .await
        .unwrap();

    let seen = backend.received();
    assert_eq!(seen[0].body, r#"{"a":1}"#);
    assert!(!seen[0].headers.contains_key("content-type"));
    assert_eq!(seen[0].headers.get("x-request-id").map(String::as_str), Some("req-7"));
}

#[tokio::test]
async fn test_backend_reason_phrase_is_recorded() {
    let custom = start_mock_backend(Reply::text(200, "fine").with_reason("All Good")).await;
    let standard = start_mock_backend(Reply::text(404, "gone")).await;
    let dispatcher = Dispatcher::new(HttpTransport::new().unwrap());

    let request = IncomingRequest::new("req-8", "GET", "/");
    let urls = vec![custom.url("/"), standard.url("/")];
    let responses = dispatcher
        .dispatch(&request, &urls, &[], Duration::from_secs(2))
        .await
        .unwrap();

    let custom = responses.get(&urls[0]).unwrap();
    assert_eq!(custom.status, 200);
    assert_eq!(custom.status_text, "All Good");
    let standard = responses.get(&urls[1]).unwrap();
    assert_eq!(standard.status, 404);
    assert_eq!(standard.status_text, "Not Found");
}
