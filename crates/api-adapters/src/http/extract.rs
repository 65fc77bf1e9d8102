//! Request extractors. Each rejection is an [`ApiError`], so failures share
//! the JSON envelope of handler errors.

use std::{convert::Infallible, sync::Arc};

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{header, request::Parts},
};
use domains::{AlertFilter, BearerToken, IncidentId};
use serde::de::DeserializeOwned;
use services::{ServiceError, Services};

use super::{error::ApiError, state::AppState};

/// The configured services. Rejects with [`ApiError::NotConfigured`].
pub struct Gateway(pub Arc<Services>);

impl FromRequestParts<AppState> for Gateway {
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state.services().map(Self)
    }
}

fn authorization(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// A well-formed `Authorization: Bearer <token>` header, or 401.
pub struct RequiredBearer(pub BearerToken);

impl<S: Send + Sync> FromRequestParts<S> for RequiredBearer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        BearerToken::require(authorization(parts))
            .map(Self)
            .map_err(|err| ApiError::Service(err.into()))
    }
}

/// The bearer token when the header is well formed; never rejects.
pub struct OptionalBearer(pub Option<BearerToken>);

impl<S: Send + Sync> FromRequestParts<S> for OptionalBearer {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(BearerToken::optional(authorization(parts))))
    }
}

/// The `{id}` path parameter as a positive integer, or 400.
pub struct ValidId(pub IncidentId);

impl<S: Send + Sync> FromRequestParts<S> for ValidId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = Path::<String>::from_request_parts(parts, state)
            .await
            .map(|Path(raw)| raw)
            .unwrap_or_default();

        IncidentId::parse(&raw)
            .map(Self)
            .map_err(|err| ApiError::Service(ServiceError::from(err)))
    }
}

/// Alert listing filters from the query string; never rejects. A repeated key
/// keeps its first value and an unreadable query selects no filter.
pub struct AlertQuery(pub AlertFilter);

impl<S: Send + Sync> FromRequestParts<S> for AlertQuery {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();
        Ok(Self(AlertFilter::from_pairs(pairs)))
    }
}

/// A JSON body, accepted whatever the declared content type. Any parse or
/// shape error is a 400 [`ApiError::MalformedBody`].
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|err| ApiError::MalformedBody(err.to_string()))
    }
}
