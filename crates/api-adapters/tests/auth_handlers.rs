mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{app, json_request, send, unconfigured_app};
use domains::{MockUpstreamApi, UpstreamError, UpstreamResponse};
use serde_json::json;

#[tokio::test]
async fn login_returns_a_normalized_session() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send()
        .withf(|req| req.segments == ["auth", "login"])
        .times(1)
        .returning(|_| {
            Ok(UpstreamResponse::json(
                200,
                json!({ "token": "jwt", "nome": "Ana Souza" }),
            ))
        });

    let (status, body) = send(
        app(mock),
        json_request(
            Method::POST,
            "/api/auth/login",
            &json!({ "email": "ana@exemplo.com", "senha": "segredo" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "jwt");
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 86_400);
    assert_eq!(body["nome"], "Ana Souza");
    assert_eq!(body["email"], "ana@exemplo.com");
}

#[tokio::test]
async fn wrong_credentials_are_401() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send()
        .returning(|_| Ok(UpstreamResponse::text(401, "Unauthorized")));

    let (status, body) = send(
        app(mock),
        json_request(
            Method::POST,
            "/api/auth/login",
            &json!({ "email": "ana@exemplo.com", "senha": "x" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({ "message": "Email ou senha incorretos", "errors": ["Credenciais inválidas"] })
    );
}

#[tokio::test]
async fn missing_email_is_400() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send().never();

    let (status, body) = send(
        app(mock),
        json_request(Method::POST, "/api/auth/login", &json!({ "senha": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "message": "Email é obrigatório", "errors": ["Email não pode ser vazio"] })
    );
}

#[tokio::test]
async fn body_that_is_not_json_is_400() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send().never();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("nome=Ana"))
        .unwrap();
    let (status, body) = send(app(mock), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Corpo da requisição inválido");
    assert!(body["errors"].is_array());
}

#[tokio::test]
async fn registration_down_upstream_is_503() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send()
        .returning(|_| Err(UpstreamError::Unreachable("connection refused".into())));

    let (status, body) = send(
        app(mock),
        json_request(
            Method::POST,
            "/api/register",
            &json!({
                "nome": "Ana",
                "email": "ana@exemplo.com",
                "senha": "segredo",
                "endereco": { "logradouro": "Rua A" }
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({
            "message": "Erro de conexão com a API em http://upstream.test. Verifique se está rodando."
        })
    );
}

#[tokio::test]
async fn unconfigured_login_is_500() {
    let (status, body) = send(
        unconfigured_app(),
        json_request(Method::POST, "/api/auth/login", &json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Configuração da API não encontrada");
}

#[tokio::test]
async fn blank_name_is_rejected_before_registration() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send().never();

    let (status, body) = send(
        app(mock),
        json_request(
            Method::POST,
            "/api/register",
            &json!({ "nome": "", "email": "a@b.com", "senha": "x1", "endereco": {} }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["Nome não pode ser vazio"]));
}
