//! Blocking client for the HawkFlow monitoring API.
//!
//! # Overview
//! Sends process start/end timings, exceptions and metric values to
//! HawkFlow. Every call validates its inputs, builds a JSON payload and
//! POSTs it, retrying transient failures a bounded number of times.
//!
//! ```rust,no_run
//! use hawkflow::HawkflowClient;
//!
//! let client = HawkflowClient::builder("my_api_key").max_retries(5).build();
//! client.start("nightly_etl", "eu-west", "run-42")?;
//! client.metrics("nightly_etl", "eu-west", [("rows", 1204.0)])?;
//! client.end("nightly_etl", "eu-west", "run-42")?;
//! # Ok::<(), hawkflow::HawkflowError>(())
//! ```
//!
//! # Design
//! - Client-side failures carry a link to the integration docs; server and
//!   transport failures are passed through verbatim.
//! - The HTTP round-trip and debug output sit behind the [`HttpSender`] and
//!   [`Logger`] traits so tests can run without a network.
//! - A 401 stops immediately; other failures are retried until the budget
//!   runs out.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod types;
pub mod validation;

pub use client::{ClientBuilder, HawkflowClient, API_KEY_HEADER};
pub use config::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES};
pub use error::{create_error, ErrorKind, HawkflowError, Result, DOCUMENTATION_URL};
pub use http::{HttpRequest, HttpResponse, HttpSender, TransportError, UreqSender, DEFAULT_TIMEOUT};
pub use logger::{Logger, TracingLogger, WriterLogger};
pub use types::{EventPayload, Operation};
