//! Input validation for event payloads and the API key.
//!
//! Each operation runs a fixed chain (process, meta, then its own field) and
//! stops at the first failure, so a request with several bad fields always
//! reports the earliest one.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{create_error, ErrorKind, Result};
use crate::types::{EventPayload, Operation};

pub const MAX_API_KEY_LEN: usize = 50;
pub const MAX_PROCESS_LEN: usize = 250;
pub const MAX_META_LEN: usize = 500;
pub const MAX_UID_LEN: usize = 50;
pub const MAX_EXCEPTION_LEN: usize = 15_000;
pub const MAX_ITEM_KEY_LEN: usize = 50;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

fn is_identifier(value: &str) -> bool {
    IDENTIFIER.is_match(value)
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn validate_api_key(api_key: &str) -> Result<()> {
    if api_key.is_empty() {
        return Err(create_error(ErrorKind::MissingApiKey, "No API Key set."));
    }
    if char_len(api_key) > MAX_API_KEY_LEN || !is_identifier(api_key) {
        return Err(create_error(ErrorKind::InvalidApiKeyFormat, "Invalid API Key format."));
    }
    Ok(())
}

pub fn validate_process(process: &str) -> Result<()> {
    if process.is_empty() {
        return Err(create_error(ErrorKind::EmptyProcess, "No process set."));
    }
    if char_len(process) > MAX_PROCESS_LEN {
        return Err(create_error(
            ErrorKind::ProcessTooLong,
            format!("Process parameter exceeded max length of {MAX_PROCESS_LEN} characters."),
        ));
    }
    if !is_identifier(process) {
        return Err(create_error(
            ErrorKind::ProcessInvalidCharacters,
            "Process parameter contains unsupported characters.",
        ));
    }
    Ok(())
}

/// Empty meta is allowed.
pub fn validate_meta(meta: &str) -> Result<()> {
    if char_len(meta) > MAX_META_LEN {
        return Err(create_error(
            ErrorKind::MetaTooLong,
            format!("Meta parameter exceeded max length of {MAX_META_LEN} characters."),
        ));
    }
    if !meta.is_empty() && !is_identifier(meta) {
        return Err(create_error(
            ErrorKind::MetaInvalidCharacters,
            "Meta parameter contains unsupported characters.",
        ));
    }
    Ok(())
}

/// Empty UID is allowed.
pub fn validate_uid(uid: &str) -> Result<()> {
    if char_len(uid) > MAX_UID_LEN {
        return Err(create_error(
            ErrorKind::UidTooLong,
            format!("UID parameter exceeded max length of {MAX_UID_LEN} characters."),
        ));
    }
    if !uid.is_empty() && !is_identifier(uid) {
        return Err(create_error(
            ErrorKind::UidInvalidCharacters,
            "UID parameter contains unsupported characters.",
        ));
    }
    Ok(())
}

/// Any content is accepted; only the length is bounded.
pub fn validate_exception_message(message: &str) -> Result<()> {
    if char_len(message) > MAX_EXCEPTION_LEN {
        return Err(create_error(
            ErrorKind::ExceptionMessageTooLong,
            format!("ExceptionMessage parameter exceeded max length of {MAX_EXCEPTION_LEN} characters."),
        ));
    }
    Ok(())
}

pub fn validate_metric_items(items: &BTreeMap<String, f64>) -> Result<()> {
    if items.is_empty() {
        return Err(create_error(ErrorKind::EmptyItems, "No items set."));
    }
    if let Some(key) = items.keys().find(|key| char_len(key) > MAX_ITEM_KEY_LEN) {
        return Err(create_error(
            ErrorKind::ItemKeyTooLong,
            format!("Item key {key} exceeded max length of {MAX_ITEM_KEY_LEN} characters."),
        ));
    }
    Ok(())
}

/// Chain for `start` and `end`.
pub fn validate_timed(payload: &EventPayload) -> Result<()> {
    validate_process(&payload.process)?;
    validate_meta(&payload.meta)?;
    validate_uid(&payload.uid)
}

pub fn validate_exception(payload: &EventPayload) -> Result<()> {
    validate_process(&payload.process)?;
    validate_meta(&payload.meta)?;
    validate_exception_message(&payload.exception_message)
}

pub fn validate_metrics(payload: &EventPayload) -> Result<()> {
    validate_process(&payload.process)?;
    validate_meta(&payload.meta)?;
    validate_metric_items(&payload.items)
}

/// Run the chain that belongs to `operation`.
pub fn validate_payload(operation: Operation, payload: &EventPayload) -> Result<()> {
    match operation {
        Operation::Start | Operation::End => validate_timed(payload),
        Operation::Exception => validate_exception(payload),
        Operation::Metrics => validate_metrics(payload),
    }
}
