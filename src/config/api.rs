//! Backend API configuration

use serde::Deserialize;
use std::time::Duration;

use super::client::Environment;
use super::error::ValidationError;

/// How the client reaches the TechVault backend
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to (may include a prefix
    /// such as `/api`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Clear the session when an authenticated call is rejected with 401
    #[serde(default = "default_logout_on_unauthorized")]
    pub logout_on_unauthorized: bool,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL without trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Base URL with a trailing `/api` segment removed; relative file paths
    /// resolve against it. Any other path prefix is kept.
    pub fn origin(&self) -> String {
        let base = self.base();
        match base.strip_suffix("/api") {
            Some(rest) if rest.find("://").is_some_and(|i| rest.len() > i + 3) => {
                rest.to_string()
            }
            _ => base.to_string(),
        }
    }

    /// Validate API configuration
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        let base = self.base();
        if base.is_empty() {
            return Err(ValidationError::MissingRequired("api.base_url"));
        }
        let is_https = base.starts_with("https://");
        if !is_https && !base.starts_with("http://") {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        if base.ends_with("://") {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        if environment == Environment::Production && !is_https {
            return Err(ValidationError::BaseUrlMustBeHttps);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            logout_on_unauthorized: default_logout_on_unauthorized(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_logout_on_unauthorized() -> bool {
    true
}
