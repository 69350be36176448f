//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the client core and the outside world. Adapters implement these ports.
//!
//! - `KeyValueStore` - Durable client-local storage for the session
//! - `CredentialSource` - Current bearer credential, read per request
//! - `TechVaultApi` - The backend HTTP contract

mod credential_source;
mod key_value_store;
mod techvault_api;

pub use credential_source::{CredentialSource, NoCredential};
pub use key_value_store::{KeyValueStore, StorageError};
pub use techvault_api::{
    ApiError, AuthResponse, DevLoginRequest, FavoriteStatus, RateRequest, RatingSummary,
    ResourceQuery, TechVaultApi, TelegramWidgetUser,
};
