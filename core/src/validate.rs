//! Classification of a transport outcome against the status an operation
//! expects.

use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::http::RawOutcome;

const NO_CONTENT: u16 = 204;

/// Bodies at or above this size are logged by length only.
const LOG_BODY_LIMIT: usize = 500;

/// Turn `outcome` into the response JSON, or the reason it isn't usable.
///
/// A 204 expectation, or an empty body on the expected status, yields an
/// empty JSON object.
pub fn validate(outcome: &RawOutcome, expected: u16) -> Result<Value> {
    if let Some(message) = &outcome.transport_error {
        return Err(ApiError::Transport(message.clone()));
    }

    if outcome.body.len() < LOG_BODY_LIMIT {
        debug!(status = outcome.status, body = %outcome.body, "response");
    } else {
        debug!(status = outcome.status, bytes = outcome.body.len(), "response (body truncated)");
    }

    if outcome.status != expected {
        return Err(ApiError::StatusMismatch {
            expected,
            actual: outcome.status,
            detail: diagnostic(&outcome.body),
        });
    }

    if expected == NO_CONTENT || outcome.body.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_str(&outcome.body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

/// Best-effort explanation extracted from an error body.
///
/// Prefers the backend's `message`, then its `errors` map, then the whole
/// JSON document; a body that isn't JSON is returned verbatim.
pub fn diagnostic(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    let json: Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(_) => return Some(body.to_string()),
    };
    if let Some(message) = json.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    if let Some(errors) = json.get("errors") {
        return Some(errors.to_string());
    }
    Some(json.to_string())
}
