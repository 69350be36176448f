//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("API base URL must use HTTPS in production")]
    BaseUrlMustBeHttps,

    #[error("Request timeout must be between 1 and 120 seconds")]
    InvalidTimeout,

    #[error("Debounce must be between 50 and 5000 milliseconds")]
    InvalidDebounce,

    #[error("Search result limit must be between 1 and 100")]
    InvalidResultLimit,

    #[error("Storage keys must be distinct")]
    DuplicateStorageKey,

    #[error("Invalid storage key {0:?}")]
    InvalidStorageKey(String),
}
