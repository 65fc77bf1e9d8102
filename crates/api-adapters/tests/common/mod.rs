#![allow(dead_code)]

use std::sync::Arc;

use api_adapters::http::{build_router, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use domains::MockUpstreamApi;
use serde_json::Value;
use services::{RelayPolicy, Services};
use tower::ServiceExt;

pub const BASE_URL: &str = "http://upstream.test";

pub fn app(mock: MockUpstreamApi) -> Router {
    build_router(AppState::new(Services::new(
        Arc::new(mock),
        RelayPolicy::new(BASE_URL),
    )))
}

pub fn unconfigured_app() -> Router {
    build_router(AppState::unconfigured())
}

pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn authorized(method: Method, uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sends one request and returns the status with the JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
