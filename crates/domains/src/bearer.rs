//! Bearer credentials taken from the browser's `Authorization` header.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{DomainError, Result};

const SCHEME_PREFIX: &str = "Bearer ";

/// A non-empty token that arrived as `Authorization: Bearer <token>`.
///
/// The token is forwarded upstream unchanged; `Debug` output is redacted.
#[derive(Debug)]
pub struct BearerToken(SecretString);

impl BearerToken {
    /// Parses a header that the operation requires.
    pub fn require(header: Option<&str>) -> Result<Self> {
        let token = header
            .and_then(|value| value.strip_prefix(SCHEME_PREFIX))
            .ok_or_else(|| DomainError::Unauthorized {
                message: "Token de autorização necessário".to_string(),
                details: Some(
                    "O header Authorization deve estar no formato 'Bearer [token]'".to_string(),
                ),
            })?;

        if token.trim().is_empty() {
            return Err(DomainError::Unauthorized {
                message: "Token de autorização inválido".to_string(),
                details: Some("Token vazio ou inválido".to_string()),
            });
        }

        Ok(Self(SecretString::from(token.to_string())))
    }

    /// Parses a header that the operation merely forwards when present.
    /// Anything malformed is dropped and the request goes out unauthenticated.
    pub fn optional(header: Option<&str>) -> Option<Self> {
        Self::require(header).ok()
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}
