//! Turning a raw `HttpResponse` into a JSON value or an `ApiError`.

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Key of the object returned for a successful response without a body.
pub const SUCCESS_MARKER: &str = "Operation finished successfully.";

/// Statuses treated as success. No other 2xx qualifies.
pub const SUCCESS_STATUSES: [u16; 3] = [200, 201, 204];

/// Reason reported for statuses without a reason phrase.
pub const UNKNOWN_REASON: &str = "<unknown status code>";

/// Interpret a response.
///
/// A success status with an empty body yields `{SUCCESS_MARKER: status}`.
/// A success status with a body yields the parsed JSON unchanged. Any other
/// status is an `ApiError::HttpError` carrying the status and reason.
pub fn check_and_retrieve_response(response: HttpResponse) -> Result<Value, ApiError> {
    if !SUCCESS_STATUSES.contains(&response.status) {
        let reason = if response.reason.trim().is_empty() {
            UNKNOWN_REASON.to_string()
        } else {
            response.reason
        };
        warn!(status = response.status, %reason, "request failed");
        return Err(ApiError::HttpError {
            status: response.status,
            reason,
        });
    }

    if response.body.trim().is_empty() {
        debug!(status = response.status, "success without a body");
        return Ok(json!({ SUCCESS_MARKER: response.status }));
    }

    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
