//! Builds `HttpRequest` values: URL, JSON headers, bearer token, and body.

use serde_json::Value;

use crate::auth::AuthState;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest};

/// Produces requests against one base URL.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
}

impl RequestBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path` (relative, starting with `/`).
    ///
    /// POST and PUT without a payload fail with `MissingPayload`. When
    /// `requires_auth` is set and `auth` holds no token this returns
    /// `AuthRequired` instead of sending an unauthenticated request.
    pub fn build(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<&Value>,
        requires_auth: bool,
        auth: &AuthState,
    ) -> Result<HttpRequest> {
        if method.requires_payload() && payload.is_none() {
            return Err(ApiError::MissingPayload {
                method,
                path: path.to_string(),
            });
        }

        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if requires_auth {
            let token = auth.token().ok_or(ApiError::AuthRequired)?;
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }

        let body = match payload {
            Some(value) if method.requires_payload() => Some(
                serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))?,
            ),
            _ => None,
        };

        Ok(HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            path: path.to_string(),
            headers,
            body,
        })
    }
}
