//! Blocking HTTP transport.
//!
//! # Design
//! `Transport` is the seam between request building and the network. The
//! default implementation drives a `ureq::Agent`; tests substitute a
//! canned transport. Connection pooling and timeouts belong to the agent,
//! so callers that need them pass their own through `from_agent`.

use tracing::debug;
use ureq::{Agent, RequestBuilder};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::response::SUCCESS_STATUSES;

/// Executes an `HttpRequest` and returns the raw response.
///
/// Non-2xx statuses are data, not errors. Only failures to complete the
/// exchange (connection refused, timeout, protocol violation) are `Err`.
/// A body that cannot be read on a failure status is dropped so the status
/// still reaches the caller.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a ureq agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wrap a caller-built agent. It must be configured with
    /// `http_status_as_error(false)` for error statuses to reach the caller
    /// with their reason phrase.
    pub fn from_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();

        let result = match (request.method, &request.body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), headers).send(body.as_bytes()),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), headers).send(body.as_bytes()),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
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
        // No size cap: the whole entity is handed to the caller.
        let body = match response.body_mut().with_config().limit(u64::MAX).read_to_string() {
            Ok(body) => body,
            Err(e) if SUCCESS_STATUSES.contains(&status.as_u16()) => {
                return Err(ApiError::Transport(e.to_string()));
            }
            Err(e) => {
                debug!(status = status.as_u16(), error = %e, "dropping unreadable error body");
                String::new()
            }
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}
