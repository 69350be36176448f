//! Search configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Debounced vault search settings
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a query is committed, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Optional `limit` sent with every search
    #[serde(default)]
    pub result_limit: Option<u32>,
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Validate search configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(50..=5000).contains(&self.debounce_ms) {
            return Err(ValidationError::InvalidDebounce);
        }
        if let Some(limit) = self.result_limit {
            if !(1..=100).contains(&limit) {
                return Err(ValidationError::InvalidResultLimit);
            }
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            result_limit: None,
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}
