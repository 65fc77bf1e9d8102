use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use services::Reply;

/// A service [`Reply`] rendered as an HTTP response.
#[derive(Debug)]
pub struct JsonReply(pub Reply);

impl From<Reply> for JsonReply {
    fn from(reply: Reply) -> Self {
        Self(reply)
    }
}

impl IntoResponse for JsonReply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::OK);
        match self.0.body {
            Some(body) => (status, Json(body)).into_response(),
            None => status.into_response(),
        }
    }
}
