//! Session storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where and under which keys the session is persisted
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory for the file-backed store
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Key holding the bearer credential
    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Key holding the serialized user summary
    #[serde(default = "default_user_key")]
    pub user_key: String,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.directory.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("storage.directory"));
        }
        for key in [&self.token_key, &self.user_key] {
            if key.trim().is_empty() || key.contains(['/', '\\']) {
                return Err(ValidationError::InvalidStorageKey(key.clone()));
            }
        }
        if self.token_key == self.user_key {
            return Err(ValidationError::DuplicateStorageKey);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            token_key: default_token_key(),
            user_key: default_user_key(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("./.techvault")
}

fn default_token_key() -> String {
    "techvault_access_token".to_string()
}

fn default_user_key() -> String {
    "techvault_user".to_string()
}
