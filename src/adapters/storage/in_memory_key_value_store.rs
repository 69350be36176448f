//! In-Memory Key/Value Store Adapter
//!
//! Useful for testing and for ephemeral (non-persistent) sessions. Failures
//! can be injected per key to exercise rollback paths.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{KeyValueStore, StorageError};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, String>,
    failing_writes: HashSet<String>,
    failing_reads: bool,
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            inner: Arc::new(RwLock::new(Inner {
                entries,
                ..Inner::default()
            })),
        }
    }

    /// Make every `set`/`remove` on `key` fail until `heal` is called
    pub async fn fail_writes_to(&self, key: &str) {
        self.inner.write().await.failing_writes.insert(key.to_string());
    }

    /// Make every `get` fail until `heal` is called
    pub async fn fail_reads(&self) {
        self.inner.write().await.failing_reads = true;
    }

    /// Clear injected failures
    pub async fn heal(&self) {
        let mut inner = self.inner.write().await;
        inner.failing_writes.clear();
        inner.failing_reads = false;
    }

    /// Copy of all stored entries
    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.inner.read().await.entries.clone()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.inner.read().await;
        if inner.failing_reads {
            return Err(StorageError::Unavailable("reads disabled".to_string()));
        }
        Ok(inner.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        if inner.failing_writes.contains(key) {
            return Err(StorageError::Unavailable(format!("writes to {} disabled", key)));
        }
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        if inner.failing_writes.contains(key) {
            return Err(StorageError::Unavailable(format!("writes to {} disabled", key)));
        }
        inner.entries.remove(key);
        Ok(())
    }
}
