//! The API request descriptor.
//!
//! # Design
//! `ApiRequest` is a plain value: the token, path, method, query and body
//! are fixed at construction and the method is validated eagerly. The
//! version segment can be replaced afterwards, and `request_url` is
//! recomputed from the current version on every call, so the URL a request
//! is built with always reflects the latest `set_version`.

use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::config::{SbgConfig, DEFAULT_BASE_URL, DEFAULT_VERSION};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};

pub const AUTH_HEADER: &str = "X-SBG-Auth-Token";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// One call against the SBG API, described but not yet dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    base_url: String,
    version: String,
    auth_token: String,
    path: String,
    method: HttpMethod,
    query: Option<Map<String, Value>>,
    body: Option<Map<String, Value>>,
}

impl ApiRequest {
    /// Describe a request against the default base URL and version.
    ///
    /// Fails with `MissingToken` for an empty token and `UnsupportedMethod`
    /// for anything other than GET, POST, PUT or DELETE.
    pub fn new(
        auth_token: &str,
        path: &str,
        method: &str,
        query: Option<Map<String, Value>>,
        body: Option<Map<String, Value>>,
    ) -> Result<Self, ApiError> {
        if auth_token.is_empty() {
            return Err(ApiError::MissingToken);
        }
        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_VERSION.to_string(),
            auth_token: auth_token.to_string(),
            path: path.trim_start_matches('/').to_string(),
            method: method.parse()?,
            query,
            body,
        })
    }

    /// Describe a request using the base URL, version and token from `config`.
    pub fn from_config(
        config: &SbgConfig,
        path: &str,
        method: &str,
        query: Option<Map<String, Value>>,
        body: Option<Map<String, Value>>,
    ) -> Result<Self, ApiError> {
        let token = config.auth_token.as_deref().ok_or(ApiError::MissingToken)?;
        Ok(Self::new(token, path, method, query, body)?
            .with_base_url(&config.base_url)
            .with_version(&config.version))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.set_version(version);
        self
    }

    pub fn set_version(&mut self, version: &str) {
        self.version = version.trim_matches('/').to_string();
    }

    /// `<base>/<version>/<path>` using the version currently in effect.
    pub fn request_url(&self) -> String {
        format!("{}/{}/{}", self.base_url, self.version, self.path)
    }

    /// The auth, accept and content-type headers sent with every request.
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![
            (AUTH_HEADER.to_string(), self.auth_token.clone()),
            ("Accept".to_string(), JSON_CONTENT_TYPE.to_string()),
            ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
        ]
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn query(&self) -> Option<&Map<String, Value>> {
        self.query.as_ref()
    }

    pub fn body(&self) -> Option<&Map<String, Value>> {
        self.body.as_ref()
    }

    /// Resolve this descriptor into a concrete `HttpRequest`.
    ///
    /// Query parameters are appended for every method. The body is only
    /// attached to POST and PUT.
    pub fn build(&self) -> Result<HttpRequest, ApiError> {
        let raw = self.request_url();
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;

        if let Some(query) = self.query.as_ref().filter(|q| !q.is_empty()) {
            let pairs = query
                .iter()
                .map(|(key, value)| query_value(key, value).map(|v| (key.as_str(), v)))
                .collect::<Result<Vec<_>, ApiError>>()?;
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let body = match (&self.body, self.method.has_body()) {
            (Some(body), true) => Some(
                serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?,
            ),
            (Some(_), false) => {
                debug!(method = %self.method, "ignoring body on a method without an entity");
                None
            }
            (None, _) => None,
        };

        debug!(method = %self.method, url = %url, "built request");
        Ok(HttpRequest {
            method: self.method,
            url: url.into(),
            headers: self.headers(),
            body,
        })
    }
}

/// String form of a query value. Scalars coerce; null, arrays and objects fail.
fn query_value(key: &str, value: &Value) -> Result<String, ApiError> {
    let kind = match value {
        Value::String(s) => return Ok(s.clone()),
        Value::Number(n) => return Ok(n.to_string()),
        Value::Bool(b) => return Ok(b.to_string()),
        Value::Null => "null",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    warn!(key, kind, "rejecting query parameter without a string form");
    Err(ApiError::InvalidQueryValue {
        key: key.to_string(),
        kind,
    })
}
