//! Flood and landslide reports, served by one parameterized service.

use std::sync::Arc;

use domains::{
    BearerToken, HttpMethod, IncidentDraft, IncidentId, IncidentKind, UpstreamBody, UpstreamRequest,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, ServiceError};
use crate::relay::{relay_success, to_json, upstream_failure, Relay};
use crate::reply::Reply;

pub struct IncidentService {
    relay: Arc<Relay>,
}

impl IncidentService {
    pub(crate) fn new(relay: Arc<Relay>) -> Self {
        Self { relay }
    }

    /// Public listing. Any upstream failure other than a timeout degrades to
    /// an empty collection.
    pub async fn list(&self, kind: IncidentKind) -> Result<Reply> {
        let request =
            UpstreamRequest::get([kind.collection()]).timeout(self.relay.policy().list_timeout);

        match self.relay.send(request).await {
            Ok(response) if response.is_success() => Ok(match response.body {
                UpstreamBody::Json(value) => Reply::ok(value),
                _ => Reply::empty_list(),
            }),
            Ok(response) => {
                warn!(%kind, status = response.status, "listing degraded to an empty collection");
                Ok(Reply::empty_list())
            }
            Err(err) if err.is_timeout() => Err(self.relay.connection_error(&err)),
            Err(err) => {
                warn!(%kind, error = %err, "listing degraded to an empty collection");
                Ok(Reply::empty_list())
            }
        }
    }

    /// Reports owned by the token's user. Never served from a cache.
    pub async fn mine(&self, kind: IncidentKind, token: BearerToken) -> Result<Reply> {
        let request = UpstreamRequest::get([kind.collection(), "meus"])
            .bearer(Some(token))
            .no_cache();

        match self.relay.send(request).await {
            Ok(response) if response.is_success() => Ok(match response.body {
                UpstreamBody::Json(list @ Value::Array(_)) => Reply::ok(list),
                other => {
                    debug!(%kind, body = ?other, "non-list body replaced by an empty collection");
                    Reply::empty_list()
                }
            }),
            Ok(response) if response.status == 401 => Err(ServiceError::Upstream {
                status: 401,
                message: response
                    .message()
                    .unwrap_or("Token inválido ou expirado")
                    .to_string(),
                errors: None,
            }),
            Ok(response) if response.status == 403 => Err(ServiceError::Upstream {
                status: 403,
                message: "Acesso negado".into(),
                errors: None,
            }),
            Ok(response) => Err(upstream_failure(
                &response,
                &format!("Erro ao buscar {}", kind.collection()),
            )),
            Err(err) if err.is_timeout() => Err(self.relay.connection_error(&err)),
            Err(err) => {
                warn!(%kind, error = %err, "listing degraded to an empty collection");
                Ok(Reply::empty_list())
            }
        }
    }

    /// Creates a report. The bearer token is forwarded only when present;
    /// the upstream decides whether anonymous reports are accepted.
    pub async fn create(
        &self,
        kind: IncidentKind,
        draft: IncidentDraft,
        token: Option<BearerToken>,
    ) -> Result<Reply> {
        draft.validate()?;
        if token.is_none() {
            debug!(%kind, "no bearer token, forwarding unauthenticated");
        }

        let request = UpstreamRequest::post([kind.collection()])
            .bearer(token)
            .json(to_json(&draft)?);

        match self.relay.send(request).await {
            Ok(response) if response.is_success() => {
                let status = response.status;
                Ok(relay_success(response, status))
            }
            Ok(response) => Err(upstream_failure(
                &response,
                &format!("Erro ao registrar {}", kind.label()),
            )),
            Err(err) => Err(self.relay.connection_error_with_cause(&err)),
        }
    }

    pub async fn get(&self, kind: IncidentKind, id: IncidentId, token: BearerToken) -> Result<Reply> {
        let request = item_request(HttpMethod::Get, kind, id, token);
        self.relay_item(request, &format!("Erro ao buscar {}", kind.label()))
            .await
    }

    pub async fn update(
        &self,
        kind: IncidentKind,
        id: IncidentId,
        token: BearerToken,
        draft: IncidentDraft,
    ) -> Result<Reply> {
        let request = item_request(HttpMethod::Put, kind, id, token).json(to_json(&draft)?);
        self.relay_item(request, &format!("Erro ao atualizar {}", kind.label()))
            .await
    }

    pub async fn delete(&self, kind: IncidentKind, id: IncidentId, token: BearerToken) -> Result<Reply> {
        let request = item_request(HttpMethod::Delete, kind, id, token);

        match self.relay.send(request).await {
            Ok(response) if response.is_success() => Ok(Reply::no_content()),
            Ok(response) => Err(upstream_failure(
                &response,
                &format!("Erro ao excluir {}", kind.label()),
            )),
            Err(err) => Err(self.relay.connection_error(&err)),
        }
    }

    async fn relay_item(&self, request: UpstreamRequest, default_message: &str) -> Result<Reply> {
        match self.relay.send(request).await {
            Ok(response) if response.is_success() => Ok(relay_success(response, 200)),
            Ok(response) => Err(upstream_failure(&response, default_message)),
            Err(err) => Err(self.relay.connection_error(&err)),
        }
    }
}

fn item_request(method: HttpMethod, kind: IncidentKind, id: IncidentId, token: BearerToken) -> UpstreamRequest {
    UpstreamRequest::new(method, [kind.collection().to_string(), id.to_string()]).bearer(Some(token))
}
