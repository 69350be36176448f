//! Session module - who is signed in, and whether we know yet.
//!
//! The `Session` value is owned by the application-layer `SessionStore`;
//! everything here is plain data with no I/O.

mod credential;
mod errors;
mod state;
mod user;

pub use credential::Credential;
pub use errors::{RestoreFailure, SessionError};
pub use state::Session;
pub use user::UserSummary;
