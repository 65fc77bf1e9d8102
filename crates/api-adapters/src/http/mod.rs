//! # HTTP adapter (axum)
//!
//! Routes mirror the upstream collections under `/api`. Extractors run in
//! argument order, so every handler takes [`extract::Gateway`] first: an
//! unconfigured upstream is reported before any input is looked at.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod reply;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use metrics::HttpMetrics;
pub use reply::JsonReply;
pub use router::build_router;
pub use state::AppState;
