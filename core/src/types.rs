//! Event payload sent to the HawkFlow API.
//!
//! # Design
//! One payload shape serves all four operations. Each operation fills
//! `process`, optionally `meta`, and exactly one of `uid`, `exception` or
//! `items`; everything left empty is dropped from the JSON body.

use std::collections::BTreeMap;

use serde::ser::Error as _;
use serde::{Serialize, Serializer};

/// The four event kinds accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Start,
    End,
    Exception,
    Metrics,
}

impl Operation {
    /// Path appended to the endpoint.
    pub fn path(self) -> &'static str {
        match self {
            Operation::Start => "start",
            Operation::End => "end",
            Operation::Exception => "exception",
            Operation::Metrics => "metrics",
        }
    }

    /// Human-readable name used in debug output.
    pub fn label(self) -> &'static str {
        match self {
            Operation::Start => "Start",
            Operation::End => "End",
            Operation::Exception => "Exception",
            Operation::Metrics => "Metrics",
        }
    }
}

/// Request body for every operation. Serializes as
/// `{"process":..,"meta":..,"uid"|"exception"|"items":..}` with empty fields
/// omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventPayload {
    pub process: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub meta: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(rename = "exception", skip_serializing_if = "String::is_empty")]
    pub exception_message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", serialize_with = "finite_items")]
    pub items: BTreeMap<String, f64>,
}

/// JSON has no NaN or infinity; refuse them rather than emit `null`.
fn finite_items<S>(items: &BTreeMap<String, f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if let Some((key, _)) = items.iter().find(|(_, value)| !value.is_finite()) {
        return Err(S::Error::custom(format!("metric item {key} is not a finite number")));
    }
    items.serialize(serializer)
}

impl EventPayload {
    /// Payload for `start` and `end`.
    pub fn timed(process: &str, meta: &str, uid: &str) -> Self {
        Self {
            process: process.to_string(),
            meta: meta.to_string(),
            uid: uid.to_string(),
            ..Self::default()
        }
    }

    pub fn exception(process: &str, meta: &str, message: &str) -> Self {
        Self {
            process: process.to_string(),
            meta: meta.to_string(),
            exception_message: message.to_string(),
            ..Self::default()
        }
    }

    pub fn metrics(process: &str, meta: &str, items: BTreeMap<String, f64>) -> Self {
        Self {
            process: process.to_string(),
            meta: meta.to_string(),
            items,
            ..Self::default()
        }
    }
}
