//! # ServiceError
//!
//! Every way an operation can fail once it reaches the service layer. The
//! web adapter turns each variant into the JSON envelope the browser reads.

use domains::DomainError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Client input rejected before any outbound call (400).
    #[error("validation error: {message}")]
    Validation { message: String, errors: Vec<String> },

    /// Missing or malformed bearer credential (401).
    #[error("unauthorized: {message}")]
    Unauthorized {
        message: String,
        details: Option<String>,
    },

    /// The upstream answered with an error status; relayed with a reshaped body.
    #[error("upstream answered {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        errors: Option<Vec<String>>,
    },

    /// No response could be obtained from the upstream (503).
    #[error("upstream unavailable: {message}")]
    Unavailable {
        message: String,
        cause: Option<String>,
    },

    /// The upstream did not answer in time (504).
    #[error("upstream timeout: {message}")]
    GatewayTimeout { message: String },

    /// Failure inside the gateway itself (500).
    #[error("internal service error: {0}")]
    Internal(String),
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message, errors } => Self::Validation { message, errors },
            DomainError::Unauthorized { message, details } => Self::Unauthorized { message, details },
        }
    }
}

/// A specialized Result type for gateway operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
