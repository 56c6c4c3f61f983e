//! Client configuration.
//!
//! Defaults target the production API. Values can also be loaded from the
//! environment so services can configure the client without code changes.

use std::env;
use std::time::Duration;

use crate::error::{HawkflowError, Result};
use crate::http::DEFAULT_TIMEOUT;

/// Production ingestion endpoint. Operation paths are appended directly, so
/// the trailing slash matters.
pub const DEFAULT_ENDPOINT: &str = "https://api.hawkflow.ai/v1/";

pub const DEFAULT_MAX_RETRIES: u8 = 3;

/// Static client settings. Behaviour-bearing collaborators (logger, sender)
/// are set on the [`ClientBuilder`](crate::ClientBuilder) instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub endpoint: String,
    pub max_retries: u8,
    pub timeout: Duration,
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            debug: false,
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads:
    /// - `HAWKFLOW_API_KEY`
    /// - `HAWKFLOW_ENDPOINT`
    /// - `HAWKFLOW_MAX_RETRIES`
    /// - `HAWKFLOW_TIMEOUT_MS`
    /// - `HAWKFLOW_DEBUG` (`1`, `true`, `yes`, `on`)
    ///
    /// Missing or unparsable values keep their defaults. The API key is not
    /// checked here; a bad key surfaces on the first send.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let max_retries = lookup("HAWKFLOW_MAX_RETRIES")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_retries);

        let timeout = lookup("HAWKFLOW_TIMEOUT_MS")
            .and_then(|s| s.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout);

        let debug = lookup("HAWKFLOW_DEBUG")
            .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(defaults.debug);

        Self {
            api_key: lookup("HAWKFLOW_API_KEY").unwrap_or_default(),
            endpoint: lookup("HAWKFLOW_ENDPOINT")
                .map(|url| normalize_endpoint(&url))
                .unwrap_or(defaults.endpoint),
            max_retries,
            timeout,
            debug,
        }
    }

    /// Reject settings no request could succeed with. The API key is left
    /// alone: it is checked on every send, so a client can be built before
    /// the key is known.
    pub fn validate(&self) -> Result<()> {
        let scheme_ok = ["http://", "https://"].iter().any(|scheme| {
            self.endpoint
                .get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        });
        if !scheme_ok {
            return Err(HawkflowError::Config(format!(
                "endpoint must be an http or https URL, got {:?}",
                self.endpoint
            )));
        }
        if self.timeout.is_zero() {
            return Err(HawkflowError::Config("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl AsRef<str>) -> Self {
        self.endpoint = normalize_endpoint(endpoint.as_ref());
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u8) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Operation paths are appended verbatim, so the endpoint must end in `/`.
pub(crate) fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.ends_with('/') {
        endpoint.to_string()
    } else {
        format!("{endpoint}/")
    }
}
