//! Key/Value Store Port - Durable client-local string storage.
//!
//! The session store keeps exactly two entries here (credential and user
//! summary). Implementations must make a single `set` appear atomic: a
//! concurrent `get` sees either the old or the new value, never a torn one.

use async_trait::async_trait;

/// Errors that can occur during key/value storage operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Port for durable client-local storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_key_error_names_key() {
        let err = StorageError::InvalidKey {
            key: "../etc".to_string(),
            reason: "path separator".to_string(),
        };
        assert!(err.to_string().contains("../etc"));
    }

    #[test]
    fn io_error_displays_cause() {
        let err = StorageError::Io("disk full".to_string());
        assert_eq!(err.to_string(), "IO error: disk full");
    }
}
