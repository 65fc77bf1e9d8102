use std::any::Any;

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use domains::IncidentKind;
use services::ServiceError;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info_span};

use super::{
    error::ApiError,
    handlers::{alerts, auth, incidents, ops},
    metrics::track_requests,
    state::AppState,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn build_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let mut api = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/register", post(auth::register))
        .route("/api/alertas", get(alerts::list).post(alerts::create));
    for kind in IncidentKind::ALL {
        api = api.merge(incident_routes(kind));
    }

    Router::new()
        .merge(api)
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .layer(middleware::from_fn_with_state(
            state.metrics().clone(),
            track_requests,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");
                    info_span!(
                        "http",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .with_state(state)
}

/// Both incident kinds share handlers; the kind travels as an extension.
fn incident_routes(kind: IncidentKind) -> Router<AppState> {
    let collection = format!("/api/{}", kind.collection());

    Router::new()
        .route(&collection, get(incidents::list).post(incidents::create))
        .route(&format!("{collection}/meus"), get(incidents::mine))
        .route(
            &format!("{collection}/{{id}}"),
            get(incidents::get)
                .put(incidents::update)
                .delete(incidents::delete),
        )
        .layer(Extension(kind))
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("handler panicked");
    ApiError::Service(ServiceError::Internal("handler panicked".into())).into_response()
}
