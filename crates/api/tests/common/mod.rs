#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use aiview_api::app::build_app;
use aiview_api::config::ServerConfig;
use aiview_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        body_limit_bytes: 64 * 1024,
        log_json: false,
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app() -> Router {
    build_app(AppState::new(test_config()))
}

/// Send a request through `app` and return the response.
pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response {
    post_raw(app, uri, serde_json::to_vec(body).unwrap()).await
}

pub async fn post_raw(app: Router, uri: &str, body: impl Into<Body>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the four envelope keys are present and `meta` carries `status`.
pub fn assert_envelope(json: &Value, status: u16) {
    assert!(json["success"].is_boolean(), "missing success in {json}");
    assert!(json["message"].is_string(), "missing message in {json}");
    assert!(json.get("data").is_some(), "missing data in {json}");
    assert_eq!(json["meta"]["status"], status, "meta.status in {json}");
    assert!(json["meta"]["statusText"].is_string(), "missing statusText in {json}");
}
