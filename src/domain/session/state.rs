//! Client session state.
//!
//! # Invariants
//!
//! - `credential` and `user` are either both present or both absent
//! - `ready` becomes true once, after the restore-from-storage attempt

use super::{Credential, UserSummary};
use crate::domain::foundation::UserId;

/// Current credential/user state of the client process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<(Credential, UserSummary)>,
    ready: bool,
}

impl Session {
    /// Session before the restore attempt has completed.
    pub fn loading() -> Self {
        Self::default()
    }

    /// Restored session with nobody signed in.
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            ready: true,
        }
    }

    /// Restored session with a signed-in user.
    pub fn authenticated(credential: Credential, user: UserSummary) -> Self {
        Self {
            identity: Some((credential, user)),
            ready: true,
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.identity.as_ref().map(|(credential, _)| credential)
    }

    pub fn user(&self) -> Option<&UserSummary> {
        self.identity.as_ref().map(|(_, user)| user)
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user().map(|user| user.id)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Credential present AND user present.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub(crate) fn set_identity(&mut self, credential: Credential, user: UserSummary) {
        self.identity = Some((credential, user));
    }

    pub(crate) fn clear_identity(&mut self) {
        self.identity = None;
    }

    pub(crate) fn mark_ready(&mut self) {
        self.ready = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> UserSummary {
        UserSummary {
            id: UserId::new(),
            telegram_id: 42,
            username: None,
            first_name: Some("Grace".to_string()),
            last_name: None,
            team_id: None,
            skill_level_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn loading_session_is_not_ready_and_not_authenticated() {
        let session = Session::loading();
        assert!(!session.is_ready());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn anonymous_session_is_ready_but_not_authenticated() {
        let session = Session::anonymous();
        assert!(session.is_ready());
        assert!(!session.is_authenticated());
        assert!(session.credential().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn authenticated_session_exposes_credential_and_user_together() {
        let user = user();
        let session = Session::authenticated(Credential::new("T").unwrap(), user.clone());
        assert!(session.is_authenticated());
        assert_eq!(session.credential().map(Credential::expose), Some("T"));
        assert_eq!(session.user(), Some(&user));
        assert_eq!(session.user_id(), Some(user.id));
    }

    #[test]
    fn clearing_identity_keeps_ready_flag() {
        let mut session = Session::authenticated(Credential::new("T").unwrap(), user());
        session.clear_identity();
        assert!(session.is_ready());
        assert!(!session.is_authenticated());
    }
}
