//! API client configuration.
//!
//! Front ends resolve these values from profiles and the environment; this
//! module only validates and normalizes them.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{normalize_base_url, normalize_text_option};

/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const GRAPHQL_PATH: &str = "/api";

/// Connection settings for the community GraphQL API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Site base URL, e.g. `https://spectrum.chat`
    pub api_base_url: String,
    /// Bearer token for authenticated mutations
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ApiConfig {
    pub fn new(
        api_base_url: &str,
        api_token: Option<String>,
        request_timeout_secs: Option<u64>,
    ) -> Result<Self> {
        let api_base_url = normalize_base_url(api_base_url).map_err(Error::InvalidInput)?;
        let request_timeout_secs = request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(Error::InvalidInput(
                "request timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            api_base_url,
            api_token: normalize_text_option(api_token),
            request_timeout_secs,
        })
    }

    /// GraphQL endpoint derived from the base URL.
    pub fn graphql_endpoint(&self) -> String {
        if self.api_base_url.ends_with(GRAPHQL_PATH) {
            self.api_base_url.clone()
        } else {
            format!("{}{GRAPHQL_PATH}", self.api_base_url)
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ApiConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
