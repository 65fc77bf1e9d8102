//! # Errors
//!
//! Client input failures detected before any outbound call, and the
//! connectivity failures an upstream adapter can report.

use thiserror::Error;

/// Failure of a domain rule. Both variants are raised before the upstream
/// service is contacted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is missing or blank, or a value is malformed.
    #[error("validation error: {message}")]
    Validation { message: String, errors: Vec<String> },

    /// The `Authorization` header is missing or not a `Bearer` credential.
    #[error("unauthorized: {message}")]
    Unauthorized {
        message: String,
        details: Option<String>,
    },
}

impl DomainError {
    /// Shorthand for a validation failure carrying a single error line.
    pub fn invalid(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors: vec![error.into()],
        }
    }
}

/// A specialized Result type for domain rules.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Why an outbound request produced no HTTP response at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The explicit per-request or client-wide timeout elapsed.
    #[error("upstream request timed out")]
    Timeout,

    /// Connection refused, DNS failure, reset before the status line.
    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    /// Any other transport failure (body read aborted, protocol error).
    #[error("upstream transport error: {0}")]
    Transport(String),

    /// The configured base URL cannot carry path segments.
    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),
}

impl UpstreamError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}
