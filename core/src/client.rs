//! Authenticated request pipeline for the Tilda API.
//!
//! # Design
//! `TildaClient` holds immutable configuration only: the credentials, the base
//! URL and a shared `Transport`. A call is split the same way at every layer:
//! `build_request` produces an `HttpRequest`, the transport executes it, and
//! `parse_response` classifies the outcome. Hosts that run their own I/O can
//! use the two halves directly.
//!
//! The body is parsed twice on purpose. The service reports logical errors
//! inside HTTP 200 responses, so the first pass reads only `status` and the
//! payload is decoded only once `status == "FOUND"`.

use std::env;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{DecodeStage, TildaError};
use crate::transport::{HttpRequest, Transport, TransportResponse, UreqTransport};

pub const DEFAULT_BASE_URL: &str = "https://api.tildacdn.info";

pub const PUBLIC_KEY_PARAM: &str = "publickey";
pub const SECRET_KEY_PARAM: &str = "secretkey";

pub const PUBLIC_KEY_ENV: &str = "TILDA_PUBLIC_KEY";
pub const SECRET_KEY_ENV: &str = "TILDA_SECRET_KEY";

const STATUS_FOUND: &str = "FOUND";
const CONTENT_TYPE: &str = "application/json;charset=utf-8";
const HTTP_OK: u16 = 200;

/// API key pair issued by Tilda.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    public_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Read `TILDA_PUBLIC_KEY` and `TILDA_SECRET_KEY`.
    pub fn from_env() -> Result<Self, TildaError> {
        let public_key =
            env::var(PUBLIC_KEY_ENV).map_err(|_| TildaError::MissingCredential(PUBLIC_KEY_ENV))?;
        let secret_key =
            env::var(SECRET_KEY_ENV).map_err(|_| TildaError::MissingCredential(SECRET_KEY_ENV))?;
        Ok(Self::new(public_key, secret_key))
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Client for the Tilda read API.
///
/// Cheap to clone; clones share the transport. Safe to use from several
/// threads as long as the transport is (the trait requires `Send + Sync`).
#[derive(Clone)]
pub struct TildaClient {
    credentials: Credentials,
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl TildaClient {
    /// Client talking to the public API over `UreqTransport`.
    pub fn new(credentials: Credentials) -> Self {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: Credentials) -> TildaClientBuilder {
        TildaClientBuilder {
            credentials,
            base_url: None,
            transport: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Describe an authenticated GET to `path` as plain data.
    ///
    /// The query starts with the credential pair, followed by `params` in
    /// order. Parameters named `publickey` or `secretkey` are rejected.
    pub fn build_request(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<HttpRequest, TildaError> {
        if path.is_empty() {
            return Err(TildaError::InvalidRequest(
                "endpoint path must not be empty".to_string(),
            ));
        }
        if let Some((name, _)) = params
            .iter()
            .find(|(name, _)| *name == PUBLIC_KEY_PARAM || *name == SECRET_KEY_PARAM)
        {
            return Err(TildaError::ReservedParam {
                name: (*name).to_string(),
            });
        }

        let mut query = Vec::with_capacity(params.len() + 2);
        query.push((PUBLIC_KEY_PARAM.to_string(), self.credentials.public_key.clone()));
        query.push((SECRET_KEY_PARAM.to_string(), self.credentials.secret_key.clone()));
        query.extend(
            params
                .iter()
                .map(|(name, value)| ((*name).to_string(), value.clone())),
        );

        Ok(HttpRequest {
            url: format!("{}{}", self.base_url, path),
            query,
            headers: vec![("content-type".to_string(), CONTENT_TYPE.to_string())],
        })
    }

    /// Classify a drained response and decode it into `T`.
    ///
    /// `T` is the whole envelope shape, not just `result`.
    pub fn parse_response<T: DeserializeOwned>(
        &self,
        url: &str,
        status: u16,
        body: &[u8],
    ) -> Result<T, TildaError> {
        if status != HTTP_OK {
            return Err(TildaError::UnexpectedStatus {
                code: status,
                url: url.to_string(),
                body: String::from_utf8_lossy(body).into_owned(),
            });
        }

        // A bare `null` body decodes to `None` and fails the status check below.
        let check: Option<StatusCheck> = serde_json::from_slice(body).map_err(|source| TildaError::Decode {
            stage: DecodeStage::Status,
            code: status,
            url: url.to_string(),
            body: String::from_utf8_lossy(body).into_owned(),
            source,
        })?;

        let found = check.and_then(|check| check.status);
        if found.as_deref() != Some(STATUS_FOUND) {
            return Err(TildaError::InvalidStatus {
                code: status,
                url: url.to_string(),
                body: String::from_utf8_lossy(body).into_owned(),
                status: found,
            });
        }

        serde_json::from_slice(body).map_err(|source| TildaError::Decode {
            stage: DecodeStage::Payload,
            code: status,
            url: url.to_string(),
            body: String::from_utf8_lossy(body).into_owned(),
            source,
        })
    }

    /// Perform one authenticated GET and decode the envelope into `T`.
    pub fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, TildaError> {
        let request = self.build_request(path, params)?;
        debug!(
            url = %request.url,
            params = ?params.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
            "sending Tilda request"
        );

        let result = self.round_trip(&request);
        if let Err(err) = &result {
            warn!(url = %request.url, code = ?err.http_code(), error = %err, "Tilda request failed");
        }
        result
    }

    fn round_trip<T: DeserializeOwned>(&self, request: &HttpRequest) -> Result<T, TildaError> {
        let TransportResponse { status, mut body } =
            self.transport
                .get(request)
                .map_err(|source| TildaError::ServiceUnavailable {
                    url: request.url.clone(),
                    source,
                })?;

        let mut bytes = Vec::new();
        let read = body.read_to_end(&mut bytes);
        drop(body);
        read.map_err(|source| TildaError::BodyRead {
            code: status,
            url: request.url.clone(),
            source,
        })?;
        debug!(url = %request.url, status, bytes = bytes.len(), "received Tilda response");

        self.parse_response(&request.url, status, &bytes)
    }
}

impl fmt::Debug for TildaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TildaClient")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TildaClient`]. Settings are fixed once `build` runs.
pub struct TildaClientBuilder {
    credentials: Credentials,
    base_url: Option<String>,
    transport: Option<Arc<dyn Transport>>,
}

impl TildaClientBuilder {
    /// Override the API root, e.g. to go through a proxy.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Share one transport between several clients.
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> TildaClient {
        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url).to_string();
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(UreqTransport::new()));

        TildaClient {
            credentials: self.credentials,
            base_url,
            transport,
        }
    }
}

/// First-pass view of a response: only the discriminator.
#[derive(Deserialize)]
struct StatusCheck {
    #[serde(default)]
    status: Option<String>,
}
