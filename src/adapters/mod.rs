//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the client to external systems:
//! - `api` - Backend access (reqwest gateway, in-memory mock)
//! - `storage` - Session persistence (files, in-memory)

pub mod api;
pub mod storage;

pub use api::{HttpGateway, MockTechVaultApi};
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
