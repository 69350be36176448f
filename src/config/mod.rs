//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TECHVAULT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use techvault_client::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Backend at {}", config.api.base_url);
//! ```

mod api;
mod client;
mod error;
mod search;
mod storage;

pub use api::ApiConfig;
pub use client::{ClientConfig, Environment};
pub use error::{ConfigError, ValidationError};
pub use search::SearchConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// development client pointed at `http://localhost:8000`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Environment and logging
    #[serde(default)]
    pub client: ClientConfig,

    /// Backend location, timeouts and 401 policy
    #[serde(default)]
    pub api: ApiConfig,

    /// Session persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Vault search debounce
    #[serde(default)]
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TECHVAULT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TECHVAULT__API__BASE_URL=https://vault.example.com/api` -> `api.base_url`
    /// - `TECHVAULT__SEARCH__DEBOUNCE_MS=300` -> `search.debounce_ms = 300`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TECHVAULT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate(self.client.environment)?;
        self.storage.validate()?;
        self.search.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.client.is_production()
    }
}
