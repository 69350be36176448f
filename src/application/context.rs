//! Client context - the one place the process-wide collaborators are built.
//!
//! Views receive a `ClientContext` (or the handlers it creates) instead of
//! reaching for globals.

use std::sync::Arc;

use super::failure::FailureReporter;
use super::handlers::{LoginHandler, ResourceDetailsLoader};
use super::notices::{NoticeBoard, NoticeKind};
use super::optimistic::OptimisticMutator;
use super::search::DebouncedQuery;
use super::session_store::{SessionKeys, SessionStore};
use crate::adapters::api::HttpGateway;
use crate::adapters::storage::FileKeyValueStore;
use crate::config::AppConfig;
use crate::domain::routing::{evaluate, Route, RouteDecision};
use crate::domain::session::{Credential, Session};
use crate::ports::{ApiError, CredentialSource, KeyValueStore, TechVaultApi};

#[derive(Clone)]
pub struct ClientContext {
    config: Arc<AppConfig>,
    session: Arc<SessionStore>,
    api: Arc<dyn TechVaultApi>,
    notices: NoticeBoard,
}

impl ClientContext {
    /// Wires file-backed storage and the HTTP gateway, then restores the
    /// persisted session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the HTTP client cannot be built.
    pub async fn build(config: AppConfig) -> Result<Self, ApiError> {
        let storage: Arc<dyn KeyValueStore> =
            Arc::new(FileKeyValueStore::new(&config.storage.directory));
        let session = Arc::new(SessionStore::new(
            storage,
            SessionKeys::from(&config.storage),
        ));
        let api: Arc<dyn TechVaultApi> = Arc::new(HttpGateway::new(&config.api, session.clone())?);

        let context = Self {
            config: Arc::new(config),
            session,
            api,
            notices: NoticeBoard::new(),
        };
        context.restore().await;
        Ok(context)
    }

    /// Assembles a context from explicit parts. The session is not restored;
    /// call `restore` before gating routes.
    pub fn with_parts(
        config: AppConfig,
        storage: Arc<dyn KeyValueStore>,
        api: Arc<dyn TechVaultApi>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(
            storage,
            SessionKeys::from(&config.storage),
        ));
        Self {
            config: Arc::new(config),
            session,
            api,
            notices: NoticeBoard::new(),
        }
    }

    pub async fn restore(&self) -> Session {
        self.session.restore().await
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn api(&self) -> &Arc<dyn TechVaultApi> {
        &self.api
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    /// Failure boundary shared by every view.
    pub fn reporter(&self) -> FailureReporter {
        FailureReporter::new(
            self.notices.clone(),
            Some(self.session.clone()),
            self.config.api.logout_on_unauthorized,
        )
    }

    pub fn mutator(&self) -> OptimisticMutator {
        OptimisticMutator::new(
            self.api.clone(),
            self.config.api.request_timeout(),
            self.reporter(),
        )
    }

    /// A fresh search box; dropping it cancels its pending work.
    pub fn search(&self) -> DebouncedQuery {
        DebouncedQuery::new(
            self.api.clone(),
            &self.config.search,
            self.config.api.request_timeout(),
            self.reporter(),
        )
    }

    pub fn login(&self) -> LoginHandler {
        LoginHandler::new(self.api.clone(), self.session.clone(), self.notices.clone())
    }

    pub fn resource_details(&self) -> ResourceDetailsLoader {
        ResourceDetailsLoader::new(
            self.api.clone(),
            self.config.api.origin(),
            self.config.api.request_timeout(),
            self.reporter(),
        )
    }

    /// Gate decision for `route` against the current session.
    pub fn route(&self, route: Route) -> RouteDecision {
        evaluate(&self.session.current(), route)
    }

    /// Credential a request sent now would carry; pass it back to
    /// `report_failure` if that request fails.
    pub fn sending_credential(&self) -> Option<Credential> {
        self.session.current_credential()
    }

    /// Reports a failure from a plain fetch (lists, profile). Posts a notice
    /// and, if configured, ends the session when the credential the request
    /// carried was rejected and is still the active one.
    pub async fn report_failure(
        &self,
        action: &str,
        error: &ApiError,
        sent_with: Option<&Credential>,
    ) {
        self.reporter()
            .report(NoticeKind::Query, action, error, sent_with)
            .await;
    }
}
