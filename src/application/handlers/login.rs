//! LoginHandler - Telegram and development sign-in.

use std::sync::Arc;
use thiserror::Error;

use crate::application::notices::{NoticeBoard, NoticeKind};
use crate::application::session_store::SessionStore;
use crate::domain::routing::{post_login_destination, Route};
use crate::domain::session::Credential;
use crate::ports::{ApiError, AuthResponse, DevLoginRequest, TechVaultApi, TelegramWidgetUser};

const GENERIC_FAILURE: &str = "Login failed";

/// Login rejected or could not be completed. `message` is shown inline on
/// the login screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub message: String,
}

impl AuthFailure {
    fn generic() -> Self {
        Self {
            message: GENERIC_FAILURE.to_string(),
        }
    }
}

impl From<&ApiError> for AuthFailure {
    fn from(error: &ApiError) -> Self {
        match error.detail() {
            Some(detail) if !detail.trim().is_empty() => Self {
                message: detail.to_string(),
            },
            _ => Self::generic(),
        }
    }
}

/// Handler for signing in and out.
pub struct LoginHandler {
    api: Arc<dyn TechVaultApi>,
    session: Arc<SessionStore>,
    notices: NoticeBoard,
}

impl LoginHandler {
    pub fn new(api: Arc<dyn TechVaultApi>, session: Arc<SessionStore>, notices: NoticeBoard) -> Self {
        Self {
            api,
            session,
            notices,
        }
    }

    /// Completes the Telegram widget callback. Returns where to navigate.
    pub async fn login_with_telegram(
        &self,
        widget_user: &TelegramWidgetUser,
        return_to: Option<Route>,
    ) -> Result<Route, AuthFailure> {
        let response = self.api.login_telegram(widget_user).await;
        self.complete(response, return_to).await
    }

    /// Backend development login (no Telegram hash check).
    pub async fn dev_login(
        &self,
        request: &DevLoginRequest,
        return_to: Option<Route>,
    ) -> Result<Route, AuthFailure> {
        let response = self.api.dev_login(request).await;
        self.complete(response, return_to).await
    }

    /// Signs out. Local state is cleared even if storage cleanup fails.
    pub async fn logout(&self) {
        if let Err(e) = self.session.clear().await {
            tracing::warn!(error = %e, "sign-out left a stored session entry behind");
        }
    }

    async fn complete(
        &self,
        response: Result<AuthResponse, ApiError>,
        return_to: Option<Route>,
    ) -> Result<Route, AuthFailure> {
        let result = self.establish(response).await;
        match result {
            Ok(()) => Ok(post_login_destination(return_to)),
            Err(failure) => {
                self.notices.push(NoticeKind::Auth, failure.message.clone());
                Err(failure)
            }
        }
    }

    async fn establish(&self, response: Result<AuthResponse, ApiError>) -> Result<(), AuthFailure> {
        let auth = response.map_err(|e| {
            tracing::warn!(error = %e, "login rejected");
            AuthFailure::from(&e)
        })?;

        let credential = Credential::new(auth.access_token).map_err(|e| {
            tracing::warn!(error = %e, "login response carried no usable token");
            AuthFailure::generic()
        })?;

        // Switching accounts: the previous user must be signed out first.
        let signed_in = self.session.current().user_id();
        if signed_in.is_some_and(|id| id != auth.user.id) {
            self.logout().await;
        }

        self.session
            .authenticate(credential, auth.user)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "could not persist session after login");
                AuthFailure::generic()
            })
    }
}
