//! # services
//!
//! The gateway's use cases. Each operation validates what the browser sent,
//! makes exactly one call through [`domains::UpstreamApi`] and normalizes
//! the outcome into a [`Reply`] or a [`ServiceError`].

pub mod alerts;
pub mod auth;
pub mod error;
pub mod incidents;
mod relay;
pub mod reply;

use std::sync::Arc;

use domains::UpstreamApi;

pub use alerts::AlertService;
pub use auth::AuthService;
pub use error::{Result, ServiceError};
pub use incidents::IncidentService;
pub use relay::RelayPolicy;
pub use reply::Reply;

use relay::Relay;

/// Every service, sharing one upstream connection and relay policy.
pub struct Services {
    pub auth: AuthService,
    pub incidents: IncidentService,
    pub alerts: AlertService,
}

impl Services {
    pub fn new(upstream: Arc<dyn UpstreamApi>, policy: RelayPolicy) -> Self {
        let relay = Arc::new(Relay::new(upstream, policy));
        Self {
            auth: AuthService::new(relay.clone()),
            incidents: IncidentService::new(relay.clone()),
            alerts: AlertService::new(relay),
        }
    }
}
