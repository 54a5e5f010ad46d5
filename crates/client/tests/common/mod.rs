#![allow(dead_code)]

use axum::Router;
use tokio::net::TcpListener;

use aiview_api::app::build_app;
use aiview_api::config::ServerConfig;
use aiview_api::state::AppState;

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Serve the full API router and return its base URL.
pub async fn spawn_api() -> String {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        body_limit_bytes: 64 * 1024,
        log_json: false,
    };
    spawn(build_app(AppState::new(config))).await
}

/// A URL on which nothing is listening.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
