//! The one stage that performs I/O.
//!
//! # Design
//! `Transport` is the seam between the deterministic pipeline and the
//! network. `UreqTransport` is the production implementation; tests plug in
//! scripted transports. A transport reports what happened and nothing more:
//! every HTTP status, 4xx and 5xx included, comes back as data in a
//! `RawOutcome`, and only failures to get an answer at all set
//! `transport_error`.

use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::http::{HttpMethod, HttpRequest, RawOutcome};

/// Executes a single HTTP request.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> RawOutcome;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> RawOutcome {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// `timeout` bounds each whole call; `None` keeps ureq's default.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> RawOutcome {
        debug!(method = %request.method, url = %request.url, "request");

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => {
                with_headers(self.agent.get(&request.url), &request.headers).call()
            }
            (HttpMethod::Delete, _) => {
                with_headers(self.agent.delete(&request.url), &request.headers).call()
            }
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&request.url), &request.headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => {
                with_headers(self.agent.post(&request.url), &request.headers).send_empty()
            }
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(&request.url), &request.headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => {
                with_headers(self.agent.put(&request.url), &request.headers).send_empty()
            }
        };

        let mut response = match result {
            Ok(response) => response,
            Err(e) => return RawOutcome::transport_failure(e.to_string()),
        };

        let status = response.status().as_u16();
        match response.body_mut().read_to_string() {
            Ok(body) => RawOutcome::response(status, body),
            Err(e) => RawOutcome::transport_failure(format!("reading response body: {e}")),
        }
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
