//! The HTTP seam between the client and the network.
//!
//! # Design
//! `HttpRequest` describes a GET call as plain data, the way the pipeline
//! builds it. A `Transport` executes it and hands back the status code plus an
//! unread body stream; draining the stream is left to the pipeline so a failed
//! read can be told apart from a failed connection. `UreqTransport` is the
//! default implementation. Tests and hosts with their own HTTP stack plug in
//! anything else that implements the trait.

use std::fmt;
use std::io::{self, Read};
use std::time::Duration;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A GET request described as plain data.
///
/// `url` is `base_url + path` without a query string. `query` holds the
/// credential pair first, followed by the caller's parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Value of the first query parameter named `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Status line and body stream returned by a `Transport`.
///
/// The body is released when the value is dropped.
pub struct TransportResponse {
    pub status: u16,
    pub body: Box<dyn Read>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Read + 'static) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }

    /// Response backed by an in-memory body.
    pub fn from_bytes(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, io::Cursor::new(body.into()))
    }
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Failures raised before any response was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    #[error("request timed out")]
    Timeout,

    #[error("transport returned no response")]
    NoResponse,

    #[error(transparent)]
    Other(BoxError),
}

/// Executes GET requests on behalf of `TildaClient`.
///
/// Implementations must be safe to share across threads; the client holds
/// one behind an `Arc` and never mutates it. Timeouts and cancellation are
/// entirely the transport's business.
pub trait Transport: Send + Sync {
    fn get(&self, request: &HttpRequest) -> Result<TransportResponse, TransportError>;
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_config(None)
    }

    /// Transport whose whole round trip is bounded by `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_config(Some(timeout))
    }

    /// Wrap a preconfigured agent.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }

    fn with_config(timeout: Option<Duration>) -> Self {
        // Non-2xx answers, redirects included, must come back as data so the
        // pipeline can classify them.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn get(&self, request: &HttpRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self.agent.get(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let builder = builder.query_pairs(
            request
                .query
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );

        match builder.call() {
            Ok(response) => {
                let status = response.status().as_u16();
                Ok(TransportResponse::new(status, response.into_body().into_reader()))
            }
            // Only reachable with an agent passed to `from_agent` that still
            // treats statuses as errors; the body is gone at that point.
            Err(ureq::Error::StatusCode(status)) => Ok(TransportResponse::new(status, io::empty())),
            Err(err) => Err(err.into()),
        }
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Timeout(_) => TransportError::Timeout,
            refused @ (ureq::Error::HostNotFound | ureq::Error::ConnectionFailed) => {
                TransportError::Connect(Box::new(refused))
            }
            ureq::Error::Io(io_err) if io_err.kind() == io::ErrorKind::ConnectionRefused => {
                TransportError::Connect(Box::new(io_err))
            }
            other => TransportError::Other(Box::new(other)),
        }
    }
}
