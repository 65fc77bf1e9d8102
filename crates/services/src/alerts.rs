//! Civil-defense alerts: filtered listing and creation.

use std::sync::Arc;

use domains::{AlertDraft, AlertFilter, BearerToken, UpstreamBody, UpstreamRequest};
use tracing::warn;

use crate::error::Result;
use crate::relay::{relay_success, to_json, upstream_failure, Relay};
use crate::reply::Reply;

pub struct AlertService {
    relay: Arc<Relay>,
}

impl AlertService {
    pub(crate) fn new(relay: Arc<Relay>) -> Self {
        Self { relay }
    }

    /// Lists alerts, narrowed by at most one filter. Degrades to an empty
    /// collection unless the upstream timed out.
    pub async fn list(&self, filter: AlertFilter) -> Result<Reply> {
        let request = UpstreamRequest::get(filter.segments());

        match self.relay.send(request).await {
            Ok(response) if response.is_success() => Ok(match response.body {
                UpstreamBody::Json(value) => Reply::ok(value),
                _ => Reply::empty_list(),
            }),
            Ok(response) => {
                warn!(status = response.status, "alert listing degraded to an empty collection");
                Ok(Reply::empty_list())
            }
            Err(err) if err.is_timeout() => Err(self.relay.connection_error(&err)),
            Err(err) => {
                warn!(error = %err, "alert listing degraded to an empty collection");
                Ok(Reply::empty_list())
            }
        }
    }

    pub async fn create(&self, draft: AlertDraft, token: Option<BearerToken>) -> Result<Reply> {
        draft.validate()?;

        let request = UpstreamRequest::post(["alertas"])
            .bearer(token)
            .json(to_json(&draft)?);

        match self.relay.send(request).await {
            Ok(response) if response.is_success() => Ok(relay_success(response, 201)),
            Ok(response) => Err(upstream_failure(&response, "Erro ao criar alerta")),
            Err(err) => Err(self.relay.connection_error(&err)),
        }
    }
}
