//! Backend API Adapters.
//!
//! Implementations of the TechVaultApi port.
//!
//! ## Available Adapters
//!
//! - `HttpGateway` - reqwest client for the real backend
//! - `MockTechVaultApi` - Configurable in-memory backend for tests and demos

mod http_gateway;
mod mock_api;

pub use http_gateway::HttpGateway;
pub use mock_api::{Endpoint, MockCall, MockTechVaultApi};
