//! Error types for the HawkFlow client.
//!
//! # Design
//! Every failure raised by the client itself (input validation, API key
//! checks, an exhausted retry budget) is built by [`create_error`], which
//! appends a pointer to the integration docs so the message is actionable on
//! its own. Failures that originate outside the client, such as a transport
//! error or a body returned by the server, are surfaced verbatim.

use thiserror::Error;

use crate::http::TransportError;

/// Integration docs appended to every client-side error.
pub const DOCUMENTATION_URL: &str = "https://docs.hawkflow.ai/integration/index.html";

/// Result alias used throughout the crate.
pub type Result<T, E = HawkflowError> = std::result::Result<T, E>;

/// Classification of client-side errors, one per rejected condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingApiKey,
    InvalidApiKeyFormat,
    EmptyProcess,
    ProcessTooLong,
    ProcessInvalidCharacters,
    MetaTooLong,
    MetaInvalidCharacters,
    UidTooLong,
    UidInvalidCharacters,
    ExceptionMessageTooLong,
    EmptyItems,
    ItemKeyTooLong,
    /// Every attempt in the retry budget failed, or the budget was zero.
    ConnectionFailedPermanently,
}

/// Errors returned by [`HawkflowClient`](crate::HawkflowClient) operations.
#[derive(Debug, Error)]
pub enum HawkflowError {
    /// Raised by the client itself; the message carries the docs link.
    #[error("{message} Please see documentation at {url}", url = DOCUMENTATION_URL)]
    Documented { kind: ErrorKind, message: String },

    /// The sender could not complete the round-trip (DNS, connect, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with something other than 201 Created.
    #[error("{}", rejection_message(.status, .body))]
    Rejected { status: u16, body: String },

    /// The payload could not be encoded as JSON.
    #[error("failed to encode request body: {0}")]
    Serialization(String),

    /// A configuration value cannot work, e.g. an endpoint that is not a URL.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HawkflowError {
    /// The documented kind, or `None` for errors raised outside the client.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Documented { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether another attempt could succeed.
    ///
    /// Transport failures and unexpected statuses are retried. A 401 means
    /// the API key was refused, which no retry will fix.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Rejected { status, .. } => *status != 401,
            Self::Documented { .. } | Self::Serialization(_) | Self::Config(_) => false,
        }
    }
}

/// Build a client-side error whose text ends with the documentation link.
pub fn create_error(kind: ErrorKind, message: impl Into<String>) -> HawkflowError {
    HawkflowError::Documented {
        kind,
        message: message.into(),
    }
}

fn rejection_message(status: &u16, body: &str) -> String {
    if body.is_empty() {
        format!("unexpected status {status}")
    } else {
        body.to_string()
    }
}
