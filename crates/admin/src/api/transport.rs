//! HTTP transport seam
//!
//! The session client speaks to the backend through the [`Transport`] trait so
//! that tests can script responses. [`UreqTransport`] is the real
//! implementation; it uses synchronous HTTP (ureq) to stay executor-agnostic.

use std::time::Duration;

use super::ApiError;

/// HTTP methods used by the backend contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully prepared request. `path` already includes the query string.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response as seen by the session client
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends requests to the backend. Implementations must not interpret status
/// codes; 4xx/5xx come back as ordinary responses.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a ureq agent
pub struct UreqTransport {
    base_url: String,
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Create a transport for `base_url` with a global per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = self.url(&request.path);

        let result = match (request.method, request.body.as_deref()) {
            (Method::Get, _) => with_headers(self.agent.get(&url), &request.headers).call(),
            (Method::Delete, _) => with_headers(self.agent.delete(&url), &request.headers).call(),
            (Method::Post, Some(body)) => {
                with_headers(self.agent.post(&url), &request.headers).send(body)
            }
            (Method::Post, None) => {
                with_headers(self.agent.post(&url), &request.headers).send_empty()
            }
            (Method::Put, Some(body)) => {
                with_headers(self.agent.put(&url), &request.headers).send(body)
            }
            (Method::Put, None) => {
                with_headers(self.agent.put(&url), &request.headers).send_empty()
            }
        };

        let mut response = result.map_err(map_ureq_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(map_ureq_error)?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn map_ureq_error(e: ureq::Error) -> ApiError {
    match e {
        ureq::Error::Timeout(_) => ApiError::Timeout,
        other => ApiError::Transport(other.to_string()),
    }
}
