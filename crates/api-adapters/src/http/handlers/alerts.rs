use domains::AlertDraft;

use crate::http::{
    error::ApiError,
    extract::{AlertQuery, Gateway, JsonBody, OptionalBearer},
    reply::JsonReply,
};

/// `GET /api/alertas[?ativos=true|?nivel=<level>]`
pub async fn list(
    Gateway(services): Gateway,
    AlertQuery(filter): AlertQuery,
) -> Result<JsonReply, ApiError> {
    Ok(services.alerts.list(filter).await?.into())
}

/// `POST /api/alertas`
pub async fn create(
    Gateway(services): Gateway,
    OptionalBearer(token): OptionalBearer,
    JsonBody(draft): JsonBody<AlertDraft>,
) -> Result<JsonReply, ApiError> {
    Ok(services.alerts.create(draft, token).await?.into())
}
