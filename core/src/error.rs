//! Error types for the SBG API client.
//!
//! # Design
//! Every failure surfaces directly to the caller; nothing here is retried.
//! Any status outside 200/201/204 lands in `HttpError` regardless of whether
//! it is a 4xx or a 5xx, carrying the status code and reason phrase.

use thiserror::Error;

/// Errors returned while building, dispatching or interpreting a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No auth token was supplied (empty string or absent from config).
    #[error("missing auth token")]
    MissingToken,

    /// The method is not one of GET, POST, PUT, DELETE.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The composed request URL could not be parsed.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// A query parameter value has no string form (null, array or object).
    #[error("query parameter `{key}` has a non-scalar value ({kind})")]
    InvalidQueryValue { key: String, kind: &'static str },

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// Connection, timeout or protocol failure in the transport.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a status other than 200, 201 or 204.
    #[error("server responded with status code {status}: {reason}")]
    HttpError { status: u16, reason: String },

    /// A successful response carried a body that is not valid JSON.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// Environment configuration could not be read.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status of an `HttpError`, `None` for every other variant.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
