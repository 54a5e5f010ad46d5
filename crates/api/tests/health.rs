//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{assert_envelope, body_json, get};

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 inside the envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_envelope() {
    let response = get(common::build_test_app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_envelope(&json, 200);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "ok");
    assert!(json["data"]["version"].is_string());
    assert!(json["data"]["uptime_secs"].is_u64());
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns a 404 envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404_envelope() {
    let response = get(common::build_test_app(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_envelope(&json, 404);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Route not found");
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let response = get(common::build_test_app(), "/health").await;

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    // The value should be a valid UUID (36 chars with hyphens).
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36);
}

// ---------------------------------------------------------------------------
// Test: a client-supplied request id is propagated unchanged
// ---------------------------------------------------------------------------

#[tokio::test]
async fn client_request_id_is_propagated() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header("x-request-id", "interview-42")
        .body(Body::empty())
        .unwrap();

    let response = common::send(common::build_test_app(), request).await;

    assert_eq!(response.headers()["x-request-id"], "interview-42");
}

// ---------------------------------------------------------------------------
// Test: CORS preflight from the configured origin is allowed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/diagnostics/echo")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = common::send(common::build_test_app(), request).await;

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}
