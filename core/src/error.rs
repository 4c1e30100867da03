//! Error types for the Tilda API client.
//!
//! # Design
//! Each failure the request pipeline can tell apart gets its own variant so
//! callers can branch on it. Variants raised after the transport answered
//! carry the HTTP code, the endpoint URL and the raw body. The URL is always
//! `base_url + path`: the credential query is never part of an error.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::datetime::DateFormatError;
use crate::transport::TransportError;

/// Code reported for failures where no HTTP response was received.
pub const SERVICE_UNAVAILABLE: u16 = 503;

/// Which of the two JSON passes over a response body failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    /// The first pass, which only extracts the `status` discriminator.
    Status,
    /// The second pass, which decodes the whole envelope into the target type.
    Payload,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeStage::Status => write!(f, "response status"),
            DecodeStage::Payload => write!(f, "response payload"),
        }
    }
}

/// Errors returned by `TildaClient` operations.
#[derive(Debug, Error)]
pub enum TildaError {
    /// The transport failed or produced no response at all.
    #[error("service unavailable at {url}: {source}")]
    ServiceUnavailable {
        url: String,
        #[source]
        source: TransportError,
    },

    /// The server answered with a status code other than 200.
    #[error("HTTP {code} from {url}: {body}")]
    UnexpectedStatus { code: u16, url: String, body: String },

    /// The response body could not be drained.
    #[error("failed to read response body from {url} (HTTP {code}): {source}")]
    BodyRead {
        code: u16,
        url: String,
        #[source]
        source: io::Error,
    },

    /// The body is not valid JSON for the stage that read it.
    #[error("failed to decode {stage} from {url} (HTTP {code}): {source}")]
    Decode {
        stage: DecodeStage,
        code: u16,
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The envelope parsed but its status is not `FOUND`.
    #[error("invalid status {status:?} from {url}, expected FOUND: {body}")]
    InvalidStatus {
        code: u16,
        url: String,
        body: String,
        status: Option<String>,
    },

    /// A `DateTime::parse` failure raised with `?` in caller code. Dates
    /// inside a response payload fail as `Decode` instead.
    #[error(transparent)]
    DateFormat(#[from] DateFormatError),

    /// A caller parameter uses one of the names reserved for credentials.
    #[error("query parameter `{name}` is reserved for credentials")]
    ReservedParam { name: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),
}

impl TildaError {
    /// HTTP code associated with the failure, if one applies.
    ///
    /// Transport failures report 503, matching how the remote service
    /// describes an unreachable endpoint.
    pub fn http_code(&self) -> Option<u16> {
        match self {
            TildaError::ServiceUnavailable { .. } => Some(SERVICE_UNAVAILABLE),
            TildaError::UnexpectedStatus { code, .. }
            | TildaError::BodyRead { code, .. }
            | TildaError::Decode { code, .. }
            | TildaError::InvalidStatus { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            TildaError::ServiceUnavailable { url, .. }
            | TildaError::UnexpectedStatus { url, .. }
            | TildaError::BodyRead { url, .. }
            | TildaError::Decode { url, .. }
            | TildaError::InvalidStatus { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Raw response body. Empty when the body was never read.
    pub fn body(&self) -> Option<&str> {
        match self {
            TildaError::UnexpectedStatus { body, .. }
            | TildaError::Decode { body, .. }
            | TildaError::InvalidStatus { body, .. } => Some(body),
            TildaError::ServiceUnavailable { .. } | TildaError::BodyRead { .. } => Some(""),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_unavailable_reports_503_and_empty_body() {
        let err = TildaError::ServiceUnavailable {
            url: "https://api.tildacdn.info/v1/getprojectslist/".to_string(),
            source: TransportError::NoResponse,
        };
        assert_eq!(err.http_code(), Some(SERVICE_UNAVAILABLE));
        assert_eq!(err.url(), Some("https://api.tildacdn.info/v1/getprojectslist/"));
        assert_eq!(err.body(), Some(""));
    }

    #[test]
    fn unexpected_status_exposes_context() {
        let err = TildaError::UnexpectedStatus {
            code: 500,
            url: "http://localhost/v1/getpage/".to_string(),
            body: "oops".to_string(),
        };
        assert_eq!(err.http_code(), Some(500));
        assert_eq!(err.body(), Some("oops"));
        assert_eq!(err.to_string(), "HTTP 500 from http://localhost/v1/getpage/: oops");
    }

    #[test]
    fn request_errors_have_no_http_context() {
        let err = TildaError::ReservedParam {
            name: "secretkey".to_string(),
        };
        assert_eq!(err.http_code(), None);
        assert_eq!(err.url(), None);
        assert_eq!(err.body(), None);
    }

    #[test]
    fn date_errors_convert() {
        let err: TildaError = crate::DateTime::parse("01.09.2021").unwrap_err().into();
        assert!(matches!(err, TildaError::DateFormat(ref e) if e.input == "01.09.2021"));
        assert_eq!(err.http_code(), None);
    }

    #[test]
    fn decode_stage_is_named_in_message() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = TildaError::Decode {
            stage: DecodeStage::Status,
            code: 200,
            url: "u".to_string(),
            body: "{".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("failed to decode response status from u"));
    }
}
