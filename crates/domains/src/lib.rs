//! # domains
//!
//! Entities, validated value types and the upstream port shared by every
//! other crate of the incident gateway. Nothing in here performs I/O.

pub mod bearer;
pub mod error;
pub mod models;
pub mod ports;

pub use bearer::BearerToken;
pub use error::{DomainError, Result, UpstreamError};
pub use models::*;
pub use ports::*;
