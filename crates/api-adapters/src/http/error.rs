use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use services::ServiceError;
use thiserror::Error;
use tracing::error;

pub(crate) const NOT_CONFIGURED_MESSAGE: &str = "Configuração da API não encontrada";
pub(crate) const MALFORMED_BODY_MESSAGE: &str = "Corpo da requisição inválido";
pub(crate) const INTERNAL_MESSAGE: &str = "Erro interno do servidor";

/// Every failure a handler can answer with.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The upstream base URL is not configured.
    #[error("upstream base url is not configured")]
    NotConfigured,

    /// The request body is not JSON or does not fit the expected shape.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// JSON body of every failure response.
#[derive(Debug, Serialize)]
struct Envelope {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Envelope {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
            details: None,
            error: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            Self::NotConfigured => {
                error!("API_BASE_URL is not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::message(NOT_CONFIGURED_MESSAGE),
                )
            }
            Self::MalformedBody(detail) => (
                StatusCode::BAD_REQUEST,
                Envelope {
                    errors: Some(vec![detail]),
                    ..Envelope::message(MALFORMED_BODY_MESSAGE)
                },
            ),
            Self::Service(err) => service_envelope(err),
        };

        (status, Json(envelope)).into_response()
    }
}

fn service_envelope(err: ServiceError) -> (StatusCode, Envelope) {
    match err {
        ServiceError::Validation { message, errors } => (
            StatusCode::BAD_REQUEST,
            Envelope {
                errors: Some(errors),
                ..Envelope::message(message)
            },
        ),
        ServiceError::Unauthorized { message, details } => (
            StatusCode::UNAUTHORIZED,
            Envelope {
                details,
                ..Envelope::message(message)
            },
        ),
        ServiceError::Upstream {
            status,
            message,
            errors,
        } => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            Envelope {
                errors,
                ..Envelope::message(message)
            },
        ),
        ServiceError::Unavailable { message, cause } => (
            StatusCode::SERVICE_UNAVAILABLE,
            Envelope {
                error: cause,
                ..Envelope::message(message)
            },
        ),
        ServiceError::GatewayTimeout { message } => {
            (StatusCode::GATEWAY_TIMEOUT, Envelope::message(message))
        }
        ServiceError::Internal(detail) => {
            error!(%detail, "internal gateway error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Envelope::message(INTERNAL_MESSAGE),
            )
        }
    }
}
