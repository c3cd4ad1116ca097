//! Dispatching API requests through a transport.
//!
//! # Design
//! `SbgClient` owns the one transport instance and nothing else. Each call
//! takes an `ApiRequest` by reference, so the same client can dispatch any
//! number of independently built requests.

use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::request::ApiRequest;
use crate::response::check_and_retrieve_response;
use crate::transport::{Transport, UreqTransport};

/// Synchronous client for the SBG API.
#[derive(Debug, Clone, Default)]
pub struct SbgClient<T = UreqTransport> {
    transport: T,
}

impl SbgClient<UreqTransport> {
    pub fn new() -> Self {
        Self::with_transport(UreqTransport::new())
    }
}

impl<T: Transport> SbgClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build `request` and execute it, returning the raw response.
    pub fn generate_request(&self, request: &ApiRequest) -> Result<HttpResponse, ApiError> {
        let http_request = request.build()?;
        let response = self.transport.execute(&http_request)?;
        debug!(
            method = %http_request.method,
            url = %http_request.url,
            status = response.status,
            "request completed"
        );
        Ok(response)
    }

    /// Dispatch `request` and interpret the response.
    pub fn send(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        check_and_retrieve_response(self.generate_request(request)?)
    }
}
