//! Credential Source Port - where the gateway reads the bearer credential.
//!
//! Read on every request, never cached by the caller.

use crate::domain::session::Credential;

pub trait CredentialSource: Send + Sync {
    /// The credential to attach right now, if anyone is signed in.
    fn current_credential(&self) -> Option<Credential>;
}

/// Source that never has a credential (unauthenticated-only clients).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredential;

impl CredentialSource for NoCredential {
    fn current_credential(&self) -> Option<Credential> {
        None
    }
}
