//! HTTP transport types and the blocking `ureq` transport.
//!
//! # Design
//! `HttpRequest` and `HttpResponse` describe an exchange as plain data. The
//! client builds requests and parses responses without touching the network;
//! a `Transport` implementation performs the GET in between. The menus API is
//! read-only, so every request is a GET and carries no body.

use crate::error::ApiError;

/// A GET request described as plain data.
///
/// Built by `MenusClient::build_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport`, then passed to `MenusClient::parse_response`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Look up a header value. Names compare case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Executes a single GET round-trip.
///
/// Implementations must return non-2xx responses as `Ok` data; only failures
/// to complete the exchange map to `ApiError::Transport`.
pub trait Transport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// Response bodies are read in full by default; `with_body_limit` caps them.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    body_limit: u64,
}

impl UreqTransport {
    pub fn new() -> Self {
        // Status interpretation belongs to the client, not the agent.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self::with_agent(agent)
    }

    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self {
            agent,
            body_limit: u64::MAX,
        }
    }

    /// Fail with `ApiError::Transport` when a body exceeds `limit` bytes.
    pub fn with_body_limit(mut self, limit: u64) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn body_limit(&self) -> u64 {
        self.body_limit
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.agent.get(&request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        let mut response = builder.call().map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 200,
            headers: vec![("x-ratelimit-limit".to_string(), "5000".to_string())],
            body: String::new(),
        };
        assert_eq!(response.header("X-Ratelimit-Limit"), Some("5000"));
        assert_eq!(response.header("X-RATELIMIT-LIMIT"), Some("5000"));
        assert_eq!(response.header("X-Ratelimit-Remaining"), None);
    }

    #[test]
    fn body_limit_defaults_to_unbounded() {
        assert_eq!(UreqTransport::new().body_limit(), u64::MAX);
        assert_eq!(UreqTransport::new().with_body_limit(1024).body_limit(), 1024);
    }

    #[test]
    fn header_lookup_returns_first_match() {
        let response = HttpResponse {
            status: 200,
            headers: vec![
                ("Accept".to_string(), "a".to_string()),
                ("accept".to_string(), "b".to_string()),
            ],
            body: String::new(),
        };
        assert_eq!(response.header("accept"), Some("a"));
    }
}
