//! HTTP request and outcome types passed between the pipeline stages.
//!
//! # Design
//! These types describe HTTP traffic as plain data. `RequestBuilder` produces
//! an `HttpRequest`, a `Transport` turns it into a `RawOutcome`, and the
//! validator interprets the outcome. Only the transport touches the network,
//! which keeps every other stage deterministic and easy to test.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// POST and PUT carry a JSON body; GET and DELETE never do.
    pub fn requires_payload(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(ApiError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute (`base_url + path`); `path` is kept alongside it for
/// logging and error messages.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What came back from one transport call.
///
/// A transport failure (connection refused, DNS, timeout) sets
/// `transport_error` and leaves `status` at 0. Otherwise `status` and `body`
/// hold the server's answer verbatim, whatever the status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutcome {
    pub status: u16,
    pub body: String,
    pub transport_error: Option<String>,
}

impl RawOutcome {
    pub fn response(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            transport_error: None,
        }
    }

    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            body: String::new(),
            transport_error: Some(message.into()),
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.transport_error.is_some()
    }
}
