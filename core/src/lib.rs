//! Synchronous client for the Tilda read API.
//!
//! # Overview
//! Every call goes through one pipeline: inject the `publickey`/`secretkey`
//! pair into the query, send a GET through a pluggable `Transport`, insist on
//! HTTP 200, check that the JSON envelope says `"status": "FOUND"`, then decode
//! the payload. Resource operations (`get_projects_list`, `get_page`, ...) are
//! thin parameterizations of that pipeline.
//!
//! # Design
//! - `TildaClient` holds only immutable configuration and a shared transport.
//! - `build_request` / `parse_response` expose the I/O boundary, so hosts with
//!   their own HTTP stack can drive the pipeline by hand.
//! - Failures are classified into `TildaError` variants carrying the HTTP
//!   code, endpoint URL and raw body.
//! - Logging goes through `tracing`; the library never installs a subscriber.
//!
//! ```no_run
//! use tilda_core::{Credentials, TildaClient};
//!
//! let client = TildaClient::new(Credentials::new("public", "secret"));
//! for project in client.get_projects_list()? {
//!     println!("{} {}", project.id, project.title);
//! }
//! # Ok::<(), tilda_core::TildaError>(())
//! ```

pub mod client;
pub mod datetime;
pub mod error;
pub mod resources;
pub mod transport;
pub mod types;

pub use client::{Credentials, TildaClient, TildaClientBuilder, DEFAULT_BASE_URL};
pub use datetime::{DateFormatError, DateTime};
pub use error::{DecodeStage, TildaError};
pub use transport::{HttpRequest, Transport, TransportError, TransportResponse, UreqTransport};
pub use types::{
    Css, Envelope, Image, Js, Page, PageExport, PageFull, PageFullExport, Project, ProjectInfo,
};
