//! Fixtures for end-to-end tests: an in-process fake of the upstream REST
//! service and a gateway wired to it through a real [`HttpUpstream`].
#![cfg(feature = "web-axum")]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use api_adapters::http::{build_router, AppState};
use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{header, HeaderMap, Method, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use services::{RelayPolicy, Services};
use tokio::net::TcpListener;
use tower::ServiceExt;
use upstream_adapters::HttpUpstream;

/// Id that makes the fake upstream answer with an HTML 502 page.
pub const HTML_FAILURE_ID: u64 = 999;

pub const VALID_PASSWORD: &str = "segredo";

#[derive(Default)]
struct Store {
    next_id: u64,
    collections: HashMap<String, Vec<Value>>,
}

type Shared = Arc<Mutex<Store>>;

/// The fake upstream: login, and create/list/fetch on any collection.
pub fn fake_upstream() -> Router {
    Router::new()
        .route("/auth/login", post(fake_login))
        .route("/{collection}", get(fake_list).post(fake_create))
        .route("/{collection}/{id}", get(fake_fetch))
        .with_state(Shared::default())
}

/// An upstream that answers every request after `delay`.
pub fn slow_upstream(delay: Duration) -> Router {
    Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        Json(json!([]))
    })
}

async fn fake_login(Json(body): Json<Value>) -> Response {
    if body["senha"] != VALID_PASSWORD {
        return (StatusCode::UNAUTHORIZED, "Bad credentials").into_response();
    }
    Json(json!({
        "access_token": "upstream-jwt",
        "refreshToken": "upstream-refresh",
        "expiresIn": 3600,
        "nome": "Ana Souza"
    }))
    .into_response()
}

async fn fake_list(State(store): State<Shared>, Path(collection): Path<String>) -> Response {
    let Ok(store) = store.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let items = store.collections.get(&collection).cloned().unwrap_or_default();
    Json(Value::Array(items)).into_response()
}

async fn fake_create(
    State(store): State<Shared>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let Ok(mut store) = store.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    store.next_id += 1;
    body["id"] = json!(store.next_id);
    body["autenticado"] = json!(headers.contains_key(header::AUTHORIZATION));
    store
        .collections
        .entry(collection)
        .or_default()
        .push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn fake_fetch(
    State(store): State<Shared>,
    Path((collection, id)): Path<(String, u64)>,
    headers: HeaderMap,
) -> Response {
    if id == HTML_FAILURE_ID {
        return (StatusCode::BAD_GATEWAY, Html("<h1>Bad Gateway</h1>")).into_response();
    }
    if !headers.contains_key(header::AUTHORIZATION) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Token ausente" }))).into_response();
    }

    let Ok(store) = store.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    store
        .collections
        .get(&collection)
        .and_then(|items| items.iter().find(|item| item["id"] == id))
        .map(|item| Json(item.clone()).into_response())
        .unwrap_or_else(|| {
            (StatusCode::NOT_FOUND, Json(json!({ "message": "Registro não encontrado" })))
                .into_response()
        })
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// The gateway router relaying to `base_url`.
pub fn gateway(base_url: &str, policy: impl FnOnce(RelayPolicy) -> RelayPolicy) -> Router {
    let upstream = HttpUpstream::new(base_url, Some(Duration::from_secs(5))).unwrap();
    build_router(AppState::new(Services::new(
        Arc::new(upstream),
        policy(RelayPolicy::new(base_url)),
    )))
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Sends one request through `app`; an empty body reads as `Value::Null`.
pub async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
