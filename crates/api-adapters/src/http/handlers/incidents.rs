//! One handler set for both incident kinds. The router attaches the kind as
//! an [`Extension`].

use axum::Extension;
use domains::{IncidentDraft, IncidentKind};

use crate::http::{
    error::ApiError,
    extract::{Gateway, JsonBody, OptionalBearer, RequiredBearer, ValidId},
    reply::JsonReply,
};

pub async fn list(
    Gateway(services): Gateway,
    Extension(kind): Extension<IncidentKind>,
) -> Result<JsonReply, ApiError> {
    Ok(services.incidents.list(kind).await?.into())
}

pub async fn mine(
    Gateway(services): Gateway,
    Extension(kind): Extension<IncidentKind>,
    RequiredBearer(token): RequiredBearer,
) -> Result<JsonReply, ApiError> {
    Ok(services.incidents.mine(kind, token).await?.into())
}

pub async fn create(
    Gateway(services): Gateway,
    Extension(kind): Extension<IncidentKind>,
    OptionalBearer(token): OptionalBearer,
    JsonBody(draft): JsonBody<IncidentDraft>,
) -> Result<JsonReply, ApiError> {
    Ok(services.incidents.create(kind, draft, token).await?.into())
}

pub async fn get(
    Gateway(services): Gateway,
    Extension(kind): Extension<IncidentKind>,
    ValidId(id): ValidId,
    RequiredBearer(token): RequiredBearer,
) -> Result<JsonReply, ApiError> {
    Ok(services.incidents.get(kind, id, token).await?.into())
}

pub async fn update(
    Gateway(services): Gateway,
    Extension(kind): Extension<IncidentKind>,
    ValidId(id): ValidId,
    RequiredBearer(token): RequiredBearer,
    JsonBody(draft): JsonBody<IncidentDraft>,
) -> Result<JsonReply, ApiError> {
    Ok(services.incidents.update(kind, id, token, draft).await?.into())
}

pub async fn delete(
    Gateway(services): Gateway,
    Extension(kind): Extension<IncidentKind>,
    ValidId(id): ValidId,
    RequiredBearer(token): RequiredBearer,
) -> Result<JsonReply, ApiError> {
    Ok(services.incidents.delete(kind, id, token).await?.into())
}
