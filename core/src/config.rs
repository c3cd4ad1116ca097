//! Environment configuration for the SBG client.

use envconfig::Envconfig;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://api.sbgenomics.com";
pub const DEFAULT_VERSION: &str = "1.1";

#[derive(Envconfig, Debug, Clone, PartialEq, Eq)]
pub struct SbgConfig {
    #[envconfig(from = "SBG_BASE_URL", default = "https://api.sbgenomics.com")]
    pub base_url: String,

    #[envconfig(from = "SBG_API_VERSION", default = "1.1")]
    pub version: String,

    #[envconfig(from = "SBG_AUTH_TOKEN")]
    pub auth_token: Option<String>,
}

impl SbgConfig {
    /// Read `SBG_BASE_URL`, `SBG_API_VERSION` and `SBG_AUTH_TOKEN`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::init_from_env().map_err(|e| ApiError::Config(e.to_string()))
    }
}

impl Default for SbgConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_VERSION.to_string(),
            auth_token: None,
        }
    }
}
