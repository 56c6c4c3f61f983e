//! HTTP transport types and the sender seam.
//!
//! # Design
//! Requests and responses are plain data. The client builds an
//! [`HttpRequest`] and hands it to an [`HttpSender`], which performs the
//! round-trip and reports back an [`HttpResponse`]. Tests swap the sender for
//! a recording fake, so retry and validation logic runs without a network.
//!
//! Every request this crate builds is a POST; the method is implied.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use ureq::Agent;

/// Per-attempt timeout used by the default sender.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// A POST request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Status and raw body returned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The sender never got a response: DNS, connect, TLS or timeout failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Executes a prepared request.
///
/// Any status code, including 4xx and 5xx, is a successful round-trip and
/// must come back as `Ok`. `Err` is reserved for requests that never got an
/// answer.
pub trait HttpSender: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpSender + ?Sized> HttpSender for Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

/// Blocking sender backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqSender {
    agent: Agent,
    timeout: Duration,
}

impl std::fmt::Debug for UreqSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqSender").field("timeout", &self.timeout).finish_non_exhaustive()
    }
}

impl UreqSender {
    pub fn new(timeout: Duration) -> Self {
        // Status codes are classified by the client, not by ureq.
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for UreqSender {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HttpSender for UreqSender {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .send(request.body.as_bytes())
            .map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(format!("failed to read response body: {e}")))?;

        Ok(HttpResponse { status, body })
    }
}
