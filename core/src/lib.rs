//! Synchronous client for the Seven Bridges Genomics REST API.
//!
//! # Overview
//! An `ApiRequest` describes one call: auth token, resource path, method,
//! optional query parameters and optional JSON body. `SbgClient` builds it
//! into an `HttpRequest` against `<base>/<version>/<path>`, executes it
//! through a `Transport`, and `check_and_retrieve_response` turns the reply
//! into a JSON value or an `ApiError`.
//!
//! # Design
//! - Unsupported methods and empty tokens are rejected when the request is
//!   described, not when it is sent.
//! - The request URL is recomputed from the current version on every access.
//! - Only 200, 201 and 204 count as success. Nothing is retried.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod transport;

pub use client::SbgClient;
pub use config::SbgConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use request::ApiRequest;
pub use response::{check_and_retrieve_response, SUCCESS_MARKER};
pub use transport::{Transport, UreqTransport};
