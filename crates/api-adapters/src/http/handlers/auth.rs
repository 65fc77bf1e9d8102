use domains::{LoginForm, RegistrationForm};

use crate::http::{
    error::ApiError,
    extract::{Gateway, JsonBody},
    reply::JsonReply,
};

/// `POST /api/auth/login`
pub async fn login(
    Gateway(services): Gateway,
    JsonBody(form): JsonBody<LoginForm>,
) -> Result<JsonReply, ApiError> {
    Ok(services.auth.login(form).await?.into())
}

/// `POST /api/register`
pub async fn register(
    Gateway(services): Gateway,
    JsonBody(form): JsonBody<RegistrationForm>,
) -> Result<JsonReply, ApiError> {
    Ok(services.auth.register(form).await?.into())
}
