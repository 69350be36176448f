//! SessionStore - the process-wide owner of the client session.
//!
//! Construct one per process and inject it (as `Arc<SessionStore>`) into
//! everything that needs the session. Durable writes and the in-memory value
//! change together under one write lock, so neither a storage reader nor a
//! watcher ever sees a credential without its user.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, OnceCell};

use crate::config::StorageConfig;
use crate::domain::session::{Credential, RestoreFailure, Session, SessionError, UserSummary};
use crate::ports::{CredentialSource, KeyValueStore};

/// Storage keys for the two persisted session entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    pub token: String,
    pub user: String,
}

impl From<&StorageConfig> for SessionKeys {
    fn from(config: &StorageConfig) -> Self {
        Self {
            token: config.token_key.clone(),
            user: config.user_key.clone(),
        }
    }
}

impl Default for SessionKeys {
    fn default() -> Self {
        SessionKeys::from(&StorageConfig::default())
    }
}

pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    keys: SessionKeys,
    state: watch::Sender<Session>,
    write_lock: Mutex<()>,
    restored: OnceCell<()>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, keys: SessionKeys) -> Self {
        let (state, _) = watch::channel(Session::loading());
        Self {
            storage,
            keys,
            state,
            write_lock: Mutex::new(()),
            restored: OnceCell::new(),
        }
    }

    /// Restores the persisted session. Runs once; later calls return the
    /// current session without touching storage.
    ///
    /// Never fails: unreadable, partial, corrupt or expired data yields an
    /// anonymous (but ready) session, and the unusable entries are purged.
    pub async fn restore(&self) -> Session {
        self.restored
            .get_or_init(|| async {
                let _guard = self.write_lock.lock().await;
                let identity = match self.load().await {
                    Ok(identity) => identity,
                    Err(failure) => {
                        tracing::warn!(reason = %failure, "session restore failed, continuing signed out");
                        if !matches!(failure, RestoreFailure::Storage(_)) {
                            self.purge().await;
                        }
                        None
                    }
                };

                self.state.send_modify(|session| {
                    // An authenticate() that won the race already holds fresher data.
                    if !session.is_authenticated() {
                        if let Some((credential, user)) = identity {
                            session.set_identity(credential, user);
                        }
                    }
                    session.mark_ready();
                });
                tracing::info!(
                    authenticated = self.state.borrow().is_authenticated(),
                    "session restored"
                );
            })
            .await;
        self.current()
    }

    async fn load(&self) -> Result<Option<(Credential, UserSummary)>, RestoreFailure> {
        let token = self
            .storage
            .get(&self.keys.token)
            .await
            .map_err(|e| RestoreFailure::Storage(e.to_string()))?;
        let user = self
            .storage
            .get(&self.keys.user)
            .await
            .map_err(|e| RestoreFailure::Storage(e.to_string()))?;

        let (token, user) = match (token, user) {
            (None, None) => return Ok(None),
            (Some(token), Some(user)) => (token, user),
            _ => return Err(RestoreFailure::Incomplete),
        };

        let credential =
            Credential::new(token).map_err(|e| RestoreFailure::CorruptCredential(e.to_string()))?;
        let user: UserSummary =
            serde_json::from_str(&user).map_err(|e| RestoreFailure::CorruptUser(e.to_string()))?;

        if let Some(expires_at) = credential.expires_at() {
            if expires_at <= Utc::now() {
                return Err(RestoreFailure::Expired(expires_at));
            }
        }
        Ok(Some((credential, user)))
    }

    async fn purge(&self) {
        for key in [&self.keys.token, &self.keys.user] {
            if let Err(e) = self.storage.remove(key).await {
                tracing::warn!(key = %key, error = %e, "failed to purge session entry");
            }
        }
    }

    /// Signs `user` in with `credential`, persisting both entries.
    ///
    /// Re-authenticating the same user (credential refresh) is allowed; a
    /// different user requires `clear()` first. If persisting fails, storage
    /// is rolled back and the in-memory session is left unchanged.
    pub async fn authenticate(
        &self,
        credential: Credential,
        user: UserSummary,
    ) -> Result<(), SessionError> {
        let _guard = self.write_lock.lock().await;

        let signed_in = self.state.borrow().user_id();
        if let Some(current) = signed_in {
            if current != user.id {
                return Err(SessionError::UserConflict {
                    current,
                    incoming: user.id,
                });
            }
        }

        let user_json =
            serde_json::to_string(&user).map_err(|e| SessionError::Serialization(e.to_string()))?;
        let previous_token = self.storage.get(&self.keys.token).await.ok().flatten();

        self.storage
            .set(&self.keys.token, credential.expose())
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;

        if let Err(e) = self.storage.set(&self.keys.user, &user_json).await {
            let rollback = match &previous_token {
                Some(token) => self.storage.set(&self.keys.token, token).await,
                None => self.storage.remove(&self.keys.token).await,
            };
            if let Err(rollback_error) = rollback {
                tracing::error!(error = %rollback_error, "failed to roll back session credential");
            }
            return Err(SessionError::Storage(e.to_string()));
        }

        let user_id = user.id;
        self.state
            .send_modify(|session| session.set_identity(credential, user));
        tracing::info!(user_id = %user_id, "session authenticated");
        Ok(())
    }

    /// Signs out. The in-memory session is always cleared; an error reports
    /// that a persisted entry could not be removed.
    pub async fn clear(&self) -> Result<(), SessionError> {
        let _guard = self.write_lock.lock().await;
        self.clear_locked().await
    }

    /// Signs out only while `credential` is still the active one, so a
    /// rejection of an old credential cannot end a newer session. Returns
    /// whether the session was cleared.
    pub async fn clear_if_current(&self, credential: &Credential) -> Result<bool, SessionError> {
        let _guard = self.write_lock.lock().await;
        if self.state.borrow().credential() != Some(credential) {
            return Ok(false);
        }
        self.clear_locked().await.map(|()| true)
    }

    async fn clear_locked(&self) -> Result<(), SessionError> {
        let mut failure = None;
        for key in [&self.keys.token, &self.keys.user] {
            if let Err(e) = self.storage.remove(key).await {
                tracing::warn!(key = %key, error = %e, "failed to remove session entry");
                failure.get_or_insert(SessionError::Storage(e.to_string()));
            }
        }

        self.state.send_modify(Session::clear_identity);
        tracing::info!("session cleared");
        failure.map_or(Ok(()), Err)
    }

    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().is_ready()
    }

    /// Waits for the restore attempt (started elsewhere) to complete.
    pub async fn wait_until_ready(&self) -> Session {
        let mut receiver = self.state.subscribe();
        let ready = receiver.wait_for(Session::is_ready).await.map(|s| s.clone());
        ready.unwrap_or_else(|_| self.current())
    }
}

impl CredentialSource for SessionStore {
    fn current_credential(&self) -> Option<Credential> {
        self.state.borrow().credential().cloned()
    }
}
