mod common;

use axum::http::{Method, StatusCode};
use common::{app, authorized, json_request, request, send, unconfigured_app};
use domains::{BearerToken, HttpMethod, MockUpstreamApi, UpstreamError, UpstreamResponse};
use serde_json::json;

#[tokio::test]
async fn unconfigured_gateway_answers_500_before_validation() {
    let (status, body) = send(
        unconfigured_app(),
        json_request(Method::POST, "/api/alagamentos", &json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Configuração da API não encontrada" }));
}

#[tokio::test]
async fn listing_relays_the_upstream_array() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send()
        .withf(|req| req.segments == ["alagamentos"] && req.timeout.is_some())
        .times(1)
        .returning(|_| Ok(UpstreamResponse::json(200, json!([{ "id": 1 }]))));

    let (status, body) = send(app(mock), request(Method::GET, "/api/alagamentos")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "id": 1 }]));
}

#[tokio::test]
async fn unreachable_upstream_lists_nothing() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send()
        .returning(|_| Err(UpstreamError::Unreachable("connection refused".into())));

    let (status, body) = send(app(mock), request(Method::GET, "/api/deslizamentos")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn listing_timeout_is_504() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send().returning(|_| Err(UpstreamError::Timeout));

    let (status, body) = send(app(mock), request(Method::GET, "/api/deslizamentos")).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(
        body["message"],
        "Tempo limite excedido ao conectar com a API em http://upstream.test"
    );
}

#[tokio::test]
async fn create_without_address_is_400_without_upstream_call() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send().never();

    let (status, body) = send(
        app(mock),
        json_request(Method::POST, "/api/deslizamentos", &json!({ "descricao": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "message": "Endereço é obrigatório", "errors": ["endereco não pode ser nulo"] })
    );
}

#[tokio::test]
async fn unknown_enum_value_is_400() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send().never();

    let (status, body) = send(
        app(mock),
        json_request(
            Method::POST,
            "/api/alagamentos",
            &json!({ "endereco": { "logradouro": "Rua A", "bairro": "Centro", "tipoSolo": "lama" } }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Corpo da requisição inválido");
}

#[tokio::test]
async fn create_forwards_a_well_formed_token_and_relays_201() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send()
        .withf(|req| {
            req.method == HttpMethod::Post
                && req.bearer.as_ref().map(BearerToken::expose) == Some("tok")
        })
        .returning(|_| Ok(UpstreamResponse::json(201, json!({ "id": 5 }))));

    let mut request = json_request(
        Method::POST,
        "/api/alagamentos",
        &json!({ "endereco": { "logradouro": "Rua A", "bairro": "Centro" } }),
    );
    request
        .headers_mut()
        .insert("authorization", "Bearer tok".parse().unwrap());

    let (status, body) = send(app(mock), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "id": 5 }));
}

#[tokio::test]
async fn invalid_id_is_checked_before_the_token() {
    for method in [Method::GET, Method::PUT, Method::DELETE] {
        for id in ["abc", "0", "-3"] {
            let uri = format!("/api/alagamentos/{id}");
            let (status, body) = send(
                app(MockUpstreamApi::new()),
                json_request(method.clone(), &uri, &json!({ "descricao": "x" })),
            )
            .await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
            assert_eq!(
                body,
                json!({ "message": "ID inválido", "errors": ["ID deve ser um número positivo"] })
            );
        }
    }
}

#[tokio::test]
async fn item_routes_require_a_bearer_header() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send().never();
    let app = app(mock);

    let (status, body) = send(
        app.clone(),
        authorized(Method::DELETE, "/api/deslizamentos/4", "Basic dXNlcjpwYXNz"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token de autorização necessário");
    assert!(body["details"].is_string());

    for method in [Method::GET, Method::PUT] {
        let (status, body) = send(
            app.clone(),
            json_request(method.clone(), "/api/deslizamentos/4", &json!({ "descricao": "x" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method}");
        assert_eq!(body["message"], "Token de autorização necessário");
    }
}

#[tokio::test]
async fn handler_panic_becomes_a_plain_500() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send()
        .returning(|_| panic!("upstream mock exploded"));

    let (status, body) = send(app(mock), request(Method::GET, "/api/alagamentos")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Erro interno do servidor" }));
    assert!(!body.to_string().contains("exploded"));
}

#[tokio::test]
async fn mine_rejects_an_empty_token() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send().never();

    let (status, body) = send(
        app(mock),
        authorized(Method::GET, "/api/alagamentos/meus", "Bearer   "),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token de autorização inválido");
}

#[tokio::test]
async fn mine_maps_forbidden() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send()
        .withf(|req| req.segments == ["alagamentos", "meus"] && req.no_cache)
        .returning(|_| Ok(UpstreamResponse::empty(403)));

    let (status, body) = send(
        app(mock),
        authorized(Method::GET, "/api/alagamentos/meus", "Bearer tok"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "message": "Acesso negado" }));
}

#[tokio::test]
async fn delete_success_is_204_without_body() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send()
        .withf(|req| req.method == HttpMethod::Delete && req.segments == ["deslizamentos", "4"])
        .returning(|_| Ok(UpstreamResponse::empty(200)));

    let (status, body) = send(
        app(mock),
        authorized(Method::DELETE, "/api/deslizamentos/4", "Bearer tok"),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
}

#[tokio::test]
async fn non_json_upstream_error_names_the_status() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send()
        .returning(|_| Ok(UpstreamResponse::text(502, "<html>Bad Gateway</html>")));

    let (status, body) = send(
        app(mock),
        authorized(Method::GET, "/api/alagamentos/9", "Bearer tok"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({ "message": "Erro 502", "errors": ["Erro 502"] }));
}

#[tokio::test]
async fn requests_are_counted_by_matched_route() {
    let mut mock = MockUpstreamApi::new();
    mock.expect_send()
        .returning(|_| Ok(UpstreamResponse::json(200, json!([]))));
    let app = app(mock);

    send(app.clone(), request(Method::GET, "/api/alagamentos")).await;
    let response = tower::ServiceExt::oneshot(app, request(Method::GET, "/metrics"))
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains(r#"route="/api/alagamentos",status="200""#), "{text}");
}
