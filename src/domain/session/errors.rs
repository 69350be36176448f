//! Session-specific error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::foundation::UserId;

/// Errors returned by session writes (`authenticate`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A different user is already signed in; `clear()` must come first.
    #[error("user {current} is already signed in; sign out before signing in as {incoming}")]
    UserConflict { current: UserId, incoming: UserId },

    /// The user summary could not be serialized for storage.
    #[error("failed to serialize session: {0}")]
    Serialization(String),

    /// Durable storage rejected the write. In-memory state is unchanged.
    #[error("session storage error: {0}")]
    Storage(String),
}

/// Reasons a restore attempt yielded an empty session.
///
/// These never reach the user; they are logged and the client proceeds as
/// logged-out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreFailure {
    #[error("session storage unavailable: {0}")]
    Storage(String),

    #[error("stored user record is corrupt: {0}")]
    CorruptUser(String),

    #[error("stored credential is malformed: {0}")]
    CorruptCredential(String),

    #[error("only one of credential and user was stored")]
    Incomplete,

    #[error("stored credential expired at {0}")]
    Expired(DateTime<Utc>),
}
