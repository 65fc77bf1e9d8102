use std::sync::Arc;

use services::Services;

use super::{error::ApiError, metrics::HttpMetrics};

/// Shared state of the router.
///
/// `services` is `None` when no upstream base URL is configured; the server
/// still starts and every proxied route answers with
/// [`ApiError::NotConfigured`].
#[derive(Clone)]
pub struct AppState {
    services: Option<Arc<Services>>,
    metrics: Arc<HttpMetrics>,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            services: Some(Arc::new(services)),
            metrics: Arc::new(HttpMetrics::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            services: None,
            metrics: Arc::new(HttpMetrics::new()),
        }
    }

    pub(crate) fn services(&self) -> Result<Arc<Services>, ApiError> {
        self.services.clone().ok_or(ApiError::NotConfigured)
    }

    pub fn metrics(&self) -> &Arc<HttpMetrics> {
        &self.metrics
    }
}
