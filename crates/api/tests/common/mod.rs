#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use autoflow_api::config::{LogFormat, ServerConfig};
use autoflow_api::router::build_app_router;
use autoflow_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        log_format: LogFormat::Text,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Goes through [`build_app_router`] so tests exercise the same middleware
/// stack (CORS, request ID, timeout, tracing, panic recovery) as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A workflow body that passes every validation rule.
pub fn valid_workflow_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "description": "Tracks vehicle position",
        "category": "TELEMATICS",
        "component_name": "GpsTracker",
        "component_type": "widget",
        "dependencies": ["DataLogger"],
        "validation_rules": ["interval > 0"],
        "created_by": "alice",
    })
}

/// Create a workflow via the API and return its id.
pub async fn create_workflow(pool: &PgPool, body: serde_json::Value) -> i64 {
    let response = post_json(build_test_app(pool.clone()), "/api/v1/workflows", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a workflow and drive it to APPROVED.
pub async fn create_approved_workflow(pool: &PgPool, body: serde_json::Value) -> i64 {
    let id = create_workflow(pool, body).await;
    let submit = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/workflows/{id}/submit"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(submit.status(), axum::http::StatusCode::OK);
    let approve = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/workflows/{id}/approve"),
        serde_json::json!({ "approved_by": "bob" }),
    )
    .await;
    assert_eq!(approve.status(), axum::http::StatusCode::OK);
    id
}
