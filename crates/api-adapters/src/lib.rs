//! # api-adapters
//!
//! Presentation adapters exposing the gateway's services to browsers.
//! `web-axum` enables the axum router.

#[cfg(feature = "web-axum")]
pub mod http;
