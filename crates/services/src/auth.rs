//! Login and registration.

use std::sync::Arc;

use chrono::Utc;
use domains::{Credentials, LoginForm, RegistrationForm, Session, UpstreamRequest, UpstreamResponse};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::error::{Result, ServiceError};
use crate::relay::{to_json, upstream_failure, Relay};
use crate::reply::Reply;

const DEV_LOGIN_MESSAGE: &str = "Login realizado com sucesso (modo desenvolvimento)";

/// Upstream field names that may carry the access token.
const TOKEN_FIELDS: [&str; 3] = ["token", "accessToken", "access_token"];

pub struct AuthService {
    relay: Arc<Relay>,
}

impl AuthService {
    pub(crate) fn new(relay: Arc<Relay>) -> Self {
        Self { relay }
    }

    pub async fn login(&self, form: LoginForm) -> Result<Reply> {
        let credentials = form.into_credentials()?;
        info!(email = %credentials.email, "login requested");

        let request = UpstreamRequest::post(["auth", "login"]).json(to_json(&credentials)?);

        match self.relay.send(request).await {
            Ok(response) if response.is_success() => {
                let session = self.open_session(&credentials, &response)?;
                Ok(Reply::ok(to_json(&session)?))
            }
            Ok(response) if response.status == 401 => Err(ServiceError::Upstream {
                status: 401,
                message: "Email ou senha incorretos".into(),
                errors: Some(vec!["Credenciais inválidas".into()]),
            }),
            Ok(response) => Err(upstream_failure(&response, "Erro ao fazer login")),
            Err(err) if self.relay.policy().dev_token_fallback => {
                warn!(error = %err, "upstream unreachable, issuing a development token");
                let stamp = Utc::now().timestamp_millis();
                let session = Session {
                    token: format!("dev-token-{stamp}"),
                    refresh_token: Some(format!("dev-refresh-{stamp}")),
                    token_type: Session::DEFAULT_TOKEN_TYPE.into(),
                    expires_in: Session::DEFAULT_EXPIRES_IN,
                    message: DEV_LOGIN_MESSAGE.into(),
                    nome: credentials.fallback_name().into(),
                    email: Some(credentials.email.clone()),
                };
                Ok(Reply::ok(to_json(&session)?))
            }
            Err(err) => Err(self.relay.connection_error(&err)),
        }
    }

    pub async fn register(&self, form: RegistrationForm) -> Result<Reply> {
        let registration = form.into_registration()?;
        info!(email = %registration.email, "registration requested");

        let request = UpstreamRequest::post(["register"]).json(to_json(&registration)?);

        match self.relay.send(request).await {
            Ok(response) if response.is_success() => {
                let mut body = Map::new();
                body.insert(
                    "message".into(),
                    json!(response.message().unwrap_or("Usuário cadastrado com sucesso")),
                );
                for key in ["id", "email", "nome"] {
                    if let Some(value) = response.json_body().and_then(|b| b.get(key)) {
                        body.insert(key.into(), value.clone());
                    }
                }
                Ok(Reply::created(Value::Object(body)))
            }
            Ok(response) if response.status == 409 => Err(ServiceError::Upstream {
                status: 409,
                message: "Email já existe".into(),
                errors: Some(vec!["Este email já está sendo usado por outro usuário".into()]),
            }),
            Ok(response) => Err(upstream_failure(&response, "Erro ao cadastrar usuário")),
            Err(err) => Err(self.relay.connection_error(&err)),
        }
    }

    fn open_session(&self, credentials: &Credentials, response: &UpstreamResponse) -> Result<Session> {
        let nome = response
            .field("nome")
            .unwrap_or_else(|| credentials.fallback_name())
            .to_string();

        let Some(token) = TOKEN_FIELDS.iter().find_map(|key| response.field(key)) else {
            if !self.relay.policy().dev_token_fallback {
                warn!("upstream login response carried no token");
                return Err(ServiceError::Upstream {
                    status: 502,
                    message: "Token não encontrado na resposta da API".into(),
                    errors: Some(vec!["Resposta de login sem token".into()]),
                });
            }

            warn!("upstream login response carried no token, issuing a development token");
            let stamp = Utc::now().timestamp_millis();
            return Ok(Session {
                token: format!("mock-jwt-token-{stamp}"),
                refresh_token: Some(
                    response
                        .field("refreshToken")
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("mock-refresh-{stamp}")),
                ),
                token_type: Session::DEFAULT_TOKEN_TYPE.into(),
                expires_in: Session::DEFAULT_EXPIRES_IN,
                message: DEV_LOGIN_MESSAGE.into(),
                nome,
                email: Some(credentials.email.clone()),
            });
        };

        Ok(Session {
            token: token.to_string(),
            refresh_token: response
                .field("refreshToken")
                .or_else(|| response.field("refresh_token"))
                .map(str::to_string),
            token_type: response
                .field("tokenType")
                .unwrap_or(Session::DEFAULT_TOKEN_TYPE)
                .to_string(),
            expires_in: response
                .json_body()
                .and_then(|body| body.get("expiresIn"))
                .and_then(Value::as_u64)
                .unwrap_or(Session::DEFAULT_EXPIRES_IN),
            message: response
                .message()
                .unwrap_or("Login realizado com sucesso")
                .to_string(),
            nome,
            email: Some(credentials.email.clone()),
        })
    }
}
