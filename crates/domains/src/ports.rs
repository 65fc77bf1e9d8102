//! # Upstream port
//!
//! The gateway owns no data. Every operation ends in exactly one call through
//! [`UpstreamApi`]; adapters decide how that call travels.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::bearer::BearerToken;
use crate::error::UpstreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// One outbound call, described independently of any HTTP client.
#[derive(Debug)]
pub struct UpstreamRequest {
    pub method: HttpMethod,
    /// Path segments below the base URL, unescaped.
    pub segments: Vec<String>,
    pub bearer: Option<BearerToken>,
    pub body: Option<Value>,
    /// Ask intermediaries not to serve a cached copy.
    pub no_cache: bool,
    /// Overrides the client-wide timeout for this call only.
    pub timeout: Option<Duration>,
}

impl UpstreamRequest {
    pub fn new<I, S>(method: HttpMethod, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            bearer: None,
            body: None,
            no_cache: false,
            timeout: None,
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Get, segments)
    }

    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Post, segments)
    }

    pub fn bearer(mut self, token: Option<BearerToken>) -> Self {
        self.bearer = token;
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Path relative to the base URL, for logs.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Decoded body of an upstream response.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    Json(Value),
    /// Body that is not JSON (HTML error pages, plain text).
    Text(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: UpstreamBody,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: UpstreamBody) -> Self {
        Self { status, body }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self::new(status, UpstreamBody::Json(body))
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, UpstreamBody::Text(body.into()))
    }

    pub fn empty(status: u16) -> Self {
        Self::new(status, UpstreamBody::Empty)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            UpstreamBody::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Non-empty string field of a JSON object body.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.json_body()?
            .get(key)?
            .as_str()
            .filter(|value| !value.is_empty())
    }

    /// `message` of a JSON error body.
    pub fn message(&self) -> Option<&str> {
        self.field("message")
    }

    /// `errors` of a JSON error body, when it is a list. Non-string entries
    /// are rendered as JSON.
    pub fn errors(&self) -> Option<Vec<String>> {
        let list = self.json_body()?.get("errors")?.as_array()?;
        Some(
            list.iter()
                .map(|entry| match entry {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )
    }
}

/// Transport to the upstream REST service.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UpstreamApi: Send + Sync {
    /// Performs the call. `Err` means no HTTP response was obtained; any
    /// status code, including 4xx and 5xx, is an `Ok`.
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError>;
}
