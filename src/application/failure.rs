//! Interaction-boundary failure handling.
//!
//! Every async operation started by a view ends here on failure: the error
//! becomes a notice (or just a log line), and a 401 on a credentialed call
//! may end the session. Nothing propagates past this point.

use std::sync::Arc;

use super::notices::{NoticeBoard, NoticeKind};
use super::session_store::SessionStore;
use crate::domain::session::Credential;
use crate::ports::{ApiError, CredentialSource};

/// Text shown for an API failure.
pub fn user_message(error: &ApiError) -> String {
    match error {
        ApiError::Network(_) => "You appear to be offline".to_string(),
        ApiError::Timeout { .. } => "The server took too long to respond".to_string(),
        ApiError::Unauthorized { .. } => "Your session has expired, please sign in again".to_string(),
        ApiError::Decode(_) => "The server sent an unexpected response".to_string(),
        other => other
            .detail()
            .map(str::to_string)
            .unwrap_or_else(|| "Something went wrong".to_string()),
    }
}

#[derive(Clone)]
pub struct FailureReporter {
    notices: NoticeBoard,
    session: Option<Arc<SessionStore>>,
    logout_on_unauthorized: bool,
}

impl FailureReporter {
    pub fn new(
        notices: NoticeBoard,
        session: Option<Arc<SessionStore>>,
        logout_on_unauthorized: bool,
    ) -> Self {
        Self {
            notices,
            session,
            logout_on_unauthorized,
        }
    }

    /// Reporter that only posts notices (no session to end).
    pub fn notices_only(notices: NoticeBoard) -> Self {
        Self::new(notices, None, false)
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// The credential a request sent now would carry. Capture this before
    /// sending; the session may change while the request is out.
    pub fn sending_credential(&self) -> Option<Credential> {
        self.session
            .as_ref()
            .and_then(|session| session.current_credential())
    }

    /// Posts a notice for `error` and applies the 401 policy.
    pub async fn report(
        &self,
        kind: NoticeKind,
        action: &str,
        error: &ApiError,
        sent_with: Option<&Credential>,
    ) {
        if !self.end_session_if_rejected(error, sent_with).await {
            self.notices
                .push(kind, format!("{}: {}", action, user_message(error)));
        }
    }

    /// Clears the session when the server rejected the credential we sent
    /// and that credential is still the active one. Returns true if the
    /// session was ended.
    pub async fn end_session_if_rejected(
        &self,
        error: &ApiError,
        sent_with: Option<&Credential>,
    ) -> bool {
        if !(error.is_unauthorized() && self.logout_on_unauthorized) {
            return false;
        }
        let (Some(session), Some(credential)) = (&self.session, sent_with) else {
            return false;
        };

        match session.clear_if_current(credential).await {
            Ok(false) => {
                tracing::debug!("ignoring rejection of a credential that is no longer active");
                return false;
            }
            Ok(true) => tracing::warn!("credential rejected by server, signed out"),
            Err(e) => tracing::warn!(error = %e, "sign-out after rejected credential was incomplete"),
        }
        self.notices.push(NoticeKind::Session, user_message(error));
        true
    }
}
