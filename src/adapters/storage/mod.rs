//! Storage Adapters
//!
//! Implementations of the KeyValueStore port for persisting the session.
//!
//! ## Available Adapters
//!
//! - **FileKeyValueStore** - One file per key in a directory
//! - **InMemoryKeyValueStore** - Process memory (testing/ephemeral sessions)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileKeyValueStore, InMemoryKeyValueStore};
//!
//! // Production: survives restarts
//! let storage = FileKeyValueStore::new("./.techvault");
//!
//! // Testing: in-memory storage
//! let storage = InMemoryKeyValueStore::new();
//! ```

mod file_key_value_store;
mod in_memory_key_value_store;

pub use file_key_value_store::FileKeyValueStore;
pub use in_memory_key_value_store::InMemoryKeyValueStore;
