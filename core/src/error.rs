//! Error types for the hotel API client.
//!
//! # Design
//! Each variant names one stage of the pipeline that can fail, so callers can
//! tell "never sent" (`AuthRequired`, `MissingPayload`) apart from "sent but
//! the network failed" (`Transport`) and "the server answered with something
//! else" (`StatusMismatch`, `MalformedResponse`, `SchemaMismatch`). The
//! dual-status fallback on destructive operations keys off
//! [`ApiError::is_status_mismatch`].

use thiserror::Error;

use crate::http::HttpMethod;

/// Shorthand for results produced by the client.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `HotelClient` operations and the pipeline stages
/// underneath it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The operation needs a bearer token and the client holds none. No
    /// request was sent.
    #[error("authentication required")]
    AuthRequired,

    /// Connection, DNS, or timeout failure reported by the transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a status other than the one the operation
    /// expects. `detail` carries whatever diagnostic the body offered.
    #[error("expected HTTP {expected}, got {actual}{}", detail_suffix(.detail))]
    StatusMismatch {
        expected: u16,
        actual: u16,
        detail: Option<String>,
    },

    /// A successful response body was not valid JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The JSON parsed but did not have the expected envelope or entity shape.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// POST and PUT requests must carry a body.
    #[error("{method} {path} requires a payload")]
    MissingPayload { method: HttpMethod, path: String },

    /// A method name outside GET, POST, PUT and DELETE.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn is_status_mismatch(&self) -> bool {
        matches!(self, ApiError::StatusMismatch { .. })
    }

    /// True when the server answered 404 where something else was expected.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::StatusMismatch { actual: 404, .. })
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {d}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mismatch_display_includes_detail() {
        let err = ApiError::StatusMismatch {
            expected: 200,
            actual: 422,
            detail: Some("The email field is required.".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "expected HTTP 200, got 422: The email field is required."
        );
    }

    #[test]
    fn status_mismatch_display_without_detail() {
        let err = ApiError::StatusMismatch {
            expected: 204,
            actual: 500,
            detail: None,
        };
        assert_eq!(err.to_string(), "expected HTTP 204, got 500");
    }

    #[test]
    fn not_found_is_a_status_mismatch() {
        let err = ApiError::StatusMismatch {
            expected: 200,
            actual: 404,
            detail: None,
        };
        assert!(err.is_not_found());
        assert!(err.is_status_mismatch());
        assert!(!ApiError::Transport("refused".into()).is_status_mismatch());
    }

    #[test]
    fn missing_payload_names_the_request() {
        let err = ApiError::MissingPayload {
            method: HttpMethod::Put,
            path: "/rooms/3".to_string(),
        };
        assert_eq!(err.to_string(), "PUT /rooms/3 requires a payload");
    }
}
