//! # Relay policy
//!
//! The normalization rules shared by every operation:
//!
//! 1. an upstream error status is relayed with a `{message, errors}` body,
//!    falling back to the operation's default message, or to `Erro <status>`
//!    when the upstream body is not JSON;
//! 2. a transport failure becomes a 503 naming the configured base URL, or a
//!    504 when it was a timeout;
//! 3. anything else is an internal error.

use std::{sync::Arc, time::Duration};

use domains::{UpstreamApi, UpstreamBody, UpstreamError, UpstreamRequest, UpstreamResponse};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::error::{Result, ServiceError};
use crate::reply::Reply;

/// Knobs of the relay, taken from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayPolicy {
    /// Upstream base URL, quoted in connectivity error messages.
    pub base_url: String,
    /// Explicit timeout of incident listings.
    pub list_timeout: Duration,
    /// Issue placeholder tokens when the upstream omits one or is down.
    /// Development only: this bypasses authentication.
    pub dev_token_fallback: bool,
}

impl RelayPolicy {
    pub const DEFAULT_LIST_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            list_timeout: Self::DEFAULT_LIST_TIMEOUT,
            dev_token_fallback: false,
        }
    }

    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    pub fn with_dev_token_fallback(mut self, enabled: bool) -> Self {
        self.dev_token_fallback = enabled;
        self
    }
}

pub(crate) struct Relay {
    upstream: Arc<dyn UpstreamApi>,
    policy: RelayPolicy,
}

impl Relay {
    pub(crate) fn new(upstream: Arc<dyn UpstreamApi>, policy: RelayPolicy) -> Self {
        Self { upstream, policy }
    }

    pub(crate) fn policy(&self) -> &RelayPolicy {
        &self.policy
    }

    pub(crate) async fn send(
        &self,
        request: UpstreamRequest,
    ) -> std::result::Result<UpstreamResponse, UpstreamError> {
        let method = request.method;
        let path = request.path();

        let result = self.upstream.send(request).await;
        match &result {
            Ok(response) => info!(?method, %path, status = response.status, "upstream responded"),
            Err(err) => error!(?method, %path, error = %err, "upstream call failed"),
        }
        result
    }

    /// Maps a transport failure to 503, or 504 for timeouts.
    pub(crate) fn connection_error(&self, err: &UpstreamError) -> ServiceError {
        if err.is_timeout() {
            return ServiceError::GatewayTimeout {
                message: format!(
                    "Tempo limite excedido ao conectar com a API em {}",
                    self.policy.base_url
                ),
            };
        }

        ServiceError::Unavailable {
            message: format!(
                "Erro de conexão com a API em {}. Verifique se está rodando.",
                self.policy.base_url
            ),
            cause: None,
        }
    }

    /// Like [`Relay::connection_error`], keeping a short description of the
    /// failure for the caller.
    pub(crate) fn connection_error_with_cause(&self, err: &UpstreamError) -> ServiceError {
        match self.connection_error(err) {
            ServiceError::Unavailable { message, .. } => ServiceError::Unavailable {
                message,
                cause: Some(err.to_string()),
            },
            other => other,
        }
    }
}

/// Reshapes an upstream error status into the uniform envelope.
pub(crate) fn upstream_failure(response: &UpstreamResponse, default_message: &str) -> ServiceError {
    let reported = match &response.body {
        UpstreamBody::Json(_) => response.message().map(str::to_string).or_else(|| {
            response
                .errors()
                .filter(|errors| !errors.is_empty())
                .map(|errors| errors.join(", "))
        }),
        UpstreamBody::Text(_) | UpstreamBody::Empty => Some(format!("Erro {}", response.status)),
    };

    let errors = response.errors().unwrap_or_else(|| {
        vec![reported
            .clone()
            .unwrap_or_else(|| "Erro desconhecido".to_string())]
    });

    ServiceError::Upstream {
        status: response.status,
        message: reported.unwrap_or_else(|| default_message.to_string()),
        errors: Some(errors),
    }
}

/// Relays a successful upstream response under `status`.
///
/// Non-JSON bodies are wrapped as `{message}`; an upstream 204 stays a 204.
pub(crate) fn relay_success(response: UpstreamResponse, status: u16) -> Reply {
    if response.status == 204 {
        return Reply::no_content();
    }

    let body = match response.body {
        UpstreamBody::Json(value) => value,
        UpstreamBody::Text(text) if !text.trim().is_empty() => json!({ "message": text }),
        UpstreamBody::Text(_) | UpstreamBody::Empty => {
            json!({ "message": "Resposta não-JSON recebida" })
        }
    };
    Reply::with_status(status, body)
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|err| ServiceError::Internal(err.to_string()))
}
