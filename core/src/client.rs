//! Blocking HawkFlow client.
//!
//! # Design
//! `HawkflowClient` holds immutable configuration plus two injected
//! capabilities: an [`HttpSender`] that performs the round-trip and a
//! [`Logger`] that receives debug lines. Each public operation validates its
//! inputs, builds an [`EventPayload`], and posts it with a bounded, immediate
//! retry loop. Nothing is shared between calls, so one client can be cloned
//! or used from several threads at once.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ureq::http::StatusCode;

use crate::config::{normalize_endpoint, ClientConfig};
use crate::error::{create_error, ErrorKind, HawkflowError, Result};
use crate::http::{HttpRequest, HttpSender, UreqSender};
use crate::logger::{Logger, TracingLogger};
use crate::types::{EventPayload, Operation};
use crate::validation::{validate_api_key, validate_payload};

/// Header carrying the API key verbatim.
pub const API_KEY_HEADER: &str = "x-hawkflow-api-key";

const STATUS_CREATED: u16 = 201;

/// Client for the HawkFlow ingestion API.
#[derive(Clone)]
pub struct HawkflowClient {
    api_key: String,
    endpoint: String,
    max_retries: u8,
    debug: bool,
    logger: Arc<dyn Logger>,
    sender: Arc<dyn HttpSender>,
}

/// Builds a [`HawkflowClient`]. Options apply in call order; a later call
/// overrides an earlier one.
pub struct ClientBuilder {
    config: ClientConfig,
    logger: Option<Arc<dyn Logger>>,
    sender: Option<Arc<dyn HttpSender>>,
}

impl ClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(api_key))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            logger: None,
            sender: None,
        }
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u8) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Replaces the sender with a default one using `timeout` per attempt,
    /// discarding any sender set earlier.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self.sender = None;
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    #[must_use]
    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    #[must_use]
    pub fn sender(mut self, sender: impl HttpSender + 'static) -> Self {
        self.sender = Some(Arc::new(sender));
        self
    }

    #[must_use]
    pub fn endpoint(mut self, endpoint: impl AsRef<str>) -> Self {
        self.config.endpoint = normalize_endpoint(endpoint.as_ref());
        self
    }

    pub fn build(self) -> HawkflowClient {
        let ClientConfig {
            api_key,
            endpoint,
            max_retries,
            timeout,
            debug,
        } = self.config;

        HawkflowClient {
            api_key,
            endpoint,
            max_retries,
            debug,
            logger: self.logger.unwrap_or_else(|| Arc::new(TracingLogger)),
            sender: self
                .sender
                .unwrap_or_else(|| Arc::new(UreqSender::new(timeout))),
        }
    }
}

impl HawkflowClient {
    /// Client with default endpoint, retry budget, timeout and logger.
    pub fn new(api_key: impl Into<String>) -> Self {
        ClientBuilder::new(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Client configured from `HAWKFLOW_*` environment variables. Fails when
    /// the endpoint or timeout is unusable; the API key is checked on send.
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env();
        config.validate()?;
        Ok(ClientBuilder::from_config(config).build())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn max_retries(&self) -> u8 {
        self.max_retries
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Mark the start of a timed process. `meta` and `uid` may be empty.
    pub fn start(&self, process: &str, meta: &str, uid: &str) -> Result<()> {
        self.dispatch(Operation::Start, EventPayload::timed(process, meta, uid))
    }

    /// Mark the end of a timed process; pass the same `uid` as the start.
    pub fn end(&self, process: &str, meta: &str, uid: &str) -> Result<()> {
        self.dispatch(Operation::End, EventPayload::timed(process, meta, uid))
    }

    pub fn exception(&self, process: &str, meta: &str, message: &str) -> Result<()> {
        self.dispatch(Operation::Exception, EventPayload::exception(process, meta, message))
    }

    /// Report named metric values. At least one item is required.
    pub fn metrics<I, K>(&self, process: &str, meta: &str, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let items = items.into_iter().map(|(key, value)| (key.into(), value)).collect();
        self.dispatch(Operation::Metrics, EventPayload::metrics(process, meta, items))
    }

    /// Build the POST request for `path` without sending it.
    pub fn build_request(&self, path: &str, payload: &EventPayload) -> Result<HttpRequest> {
        let body =
            serde_json::to_string(payload).map_err(|e| HawkflowError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            url: format!("{}{path}", self.endpoint),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                (API_KEY_HEADER.to_string(), self.api_key.clone()),
            ],
            body,
        })
    }

    fn dispatch(&self, operation: Operation, payload: EventPayload) -> Result<()> {
        validate_payload(operation, &payload)?;
        self.log(format_args!("{}: {}", operation.label(), payload.process));
        self.send_with_retry(operation.path(), &payload, self.max_retries)
    }

    /// Send with up to `budget` attempts. A budget of zero fails without
    /// touching the network.
    fn send_with_retry(&self, path: &str, payload: &EventPayload, budget: u8) -> Result<()> {
        for attempt in 1..=budget {
            match self.send(path, payload) {
                Ok(()) => return Ok(()),
                Err(error) => {
                    self.log(format_args!(
                        "Connection failed on attempt {attempt} with error: {error}"
                    ));
                    if !error.is_retryable() {
                        return Err(error);
                    }
                }
            }
        }

        Err(create_error(
            ErrorKind::ConnectionFailedPermanently,
            "Connection failed permanently.",
        ))
    }

    /// One attempt. The API key is checked here so a bad key never reaches
    /// the wire.
    fn send(&self, path: &str, payload: &EventPayload) -> Result<()> {
        validate_api_key(&self.api_key)?;
        let request = self.build_request(path, payload)?;

        self.log(format_args!("Requesting path: {path}"));
        self.log(format_args!("Sending data: {}", request.body));

        let response = self.sender.send(&request)?;

        self.log(format_args!("Response Status: {}", status_line(response.status)));
        self.log(format_args!("Response Body: {}", response.body));

        if response.status == STATUS_CREATED {
            Ok(())
        } else {
            Err(HawkflowError::Rejected {
                status: response.status,
                body: response.body,
            })
        }
    }

    fn log(&self, message: fmt::Arguments<'_>) {
        if self.debug {
            self.logger.print(&format!("HF {message}"));
        }
    }
}

/// `201 Created` style status text; bare code when the reason is unknown.
fn status_line(status: u16) -> String {
    match StatusCode::from_u16(status).ok().and_then(|code| code.canonical_reason()) {
        Some(reason) => format!("{status} {reason}"),
        None => status.to_string(),
    }
}

impl fmt::Debug for HawkflowClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HawkflowClient")
            .field("endpoint", &self.endpoint)
            .field("max_retries", &self.max_retries)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}
