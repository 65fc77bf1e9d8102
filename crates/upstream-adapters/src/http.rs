use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use domains::{HttpMethod, UpstreamApi, UpstreamBody, UpstreamError, UpstreamRequest, UpstreamResponse};
use reqwest::{header, Client, Method, Url};
use tracing::debug;

/// [`UpstreamApi`] over HTTP/1.1 with a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    base_url: Url,
}

impl HttpUpstream {
    /// Builds a client for `base_url`. `timeout` bounds every call that does
    /// not carry its own; `None` leaves calls unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|err| UpstreamError::InvalidUrl(format!("{base_url}: {err}")))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(UpstreamError::InvalidUrl(base_url.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| UpstreamError::Transport(err.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Appends percent-encoded segments to the base path. Dot segments are
    /// refused since the URL parser would resolve them.
    fn url_for(&self, segments: &[String]) -> Result<Url, UpstreamError> {
        if let Some(dot) = segments.iter().find(|segment| is_dot_segment(segment)) {
            return Err(UpstreamError::InvalidUrl(format!(
                "{}: dot segment {dot:?}",
                self.base_url
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    matches!(decoded.as_str(), "." | "..")
}

#[async_trait]
impl UpstreamApi for HttpUpstream {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.url_for(&request.segments)?;
        debug!(%url, method = ?request.method, "sending upstream request");

        let mut builder = self.client.request(method(request.method), url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.expose());
        }
        if request.no_cache {
            builder = builder.header(header::CACHE_CONTROL, "no-cache");
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<mime::Mime>().ok());
        let bytes = response.bytes().await.map_err(classify)?;

        Ok(UpstreamResponse::new(status, decode_body(content_type.as_ref(), bytes)))
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn classify(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        return UpstreamError::Timeout;
    }

    let refused = err.is_connect();
    let detail = err.without_url().to_string();
    if refused {
        UpstreamError::Unreachable(detail)
    } else {
        UpstreamError::Transport(detail)
    }
}

fn is_json(content_type: &mime::Mime) -> bool {
    content_type.subtype() == mime::JSON || content_type.suffix() == Some(mime::JSON)
}

/// Decodes a body as JSON only when the upstream declared it as such; a
/// declared-JSON body that fails to parse is kept as text.
fn decode_body(content_type: Option<&mime::Mime>, bytes: Bytes) -> UpstreamBody {
    if bytes.is_empty() {
        return UpstreamBody::Empty;
    }

    if content_type.is_some_and(is_json) {
        if let Ok(value) = serde_json::from_slice(&bytes) {
            return UpstreamBody::Json(value);
        }
    }

    UpstreamBody::Text(String::from_utf8_lossy(&bytes).into_owned())
}
