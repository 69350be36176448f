//! Debounced, cancellation-aware search pipeline.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

use crate::application::failure::{user_message, FailureReporter};
use crate::config::SearchConfig;
use crate::domain::search::{Commit, InputChange, QueryPhase, QueryState};
use crate::ports::{ApiError, ResourceQuery, TechVaultApi};

struct Inner {
    state: watch::Sender<QueryState>,
    api: Arc<dyn TechVaultApi>,
    debounce: Duration,
    request_timeout: Duration,
    limit: Option<u32>,
    reporter: FailureReporter,
    shutdown: CancellationToken,
}

/// Turns keystrokes into at most one request per quiet period.
///
/// Every edit restarts the quiet period; a request is only sent for input
/// that stayed unchanged for the full debounce. Responses are applied only
/// if their generation is still current, so the visible results never
/// belong to a superseded query. Must be used inside a tokio runtime.
pub struct DebouncedQuery {
    inner: Arc<Inner>,
}

impl DebouncedQuery {
    pub fn new(
        api: Arc<dyn TechVaultApi>,
        config: &SearchConfig,
        request_timeout: Duration,
        reporter: FailureReporter,
    ) -> Self {
        let (state, _) = watch::channel(QueryState::new());
        Self {
            inner: Arc::new(Inner {
                state,
                api,
                debounce: config.debounce(),
                request_timeout,
                limit: config.result_limit,
                reporter,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Records new input. Blank input clears the results immediately;
    /// anything else (re)starts the quiet period.
    pub fn set_input(&self, input: impl Into<String>) {
        if self.inner.shutdown.is_cancelled() {
            return;
        }
        let input = input.into();
        let mut change = InputChange::Cleared;
        self.inner.state.send_modify(|state| change = state.edit(input));

        match change {
            InputChange::Cleared => tracing::debug!("search input cleared"),
            InputChange::Debounce { revision } => {
                tokio::spawn(Self::debounce_then_fetch(Arc::clone(&self.inner), revision));
            }
        }
    }

    pub fn state(&self) -> QueryState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.inner.state.subscribe()
    }

    /// Waits until the box is Idle or Settled (or closed) and returns the
    /// state at that point.
    pub async fn wait_settled(&self) -> QueryState {
        let mut updates = self.inner.state.subscribe();
        tokio::select! {
            _ = self.inner.shutdown.cancelled() => {}
            _ = updates.wait_for(|s| matches!(s.phase(), QueryPhase::Idle | QueryPhase::Settled)) => {}
        }
        self.state()
    }

    /// Stops pending timers and abandons in-flight requests; nothing will
    /// modify the state afterwards.
    pub fn close(&self) {
        self.inner.shutdown.cancel();
        self.inner.state.send_modify(|state| state.invalidate());
    }

    async fn debounce_then_fetch(inner: Arc<Inner>, revision: u64) {
        tokio::select! {
            _ = inner.shutdown.cancelled() => return,
            _ = sleep(inner.debounce) => {}
        }

        let mut commit = None;
        inner.state.send_if_modified(|state| {
            commit = state.commit(revision);
            commit.is_some()
        });
        // A later edit restarted the quiet period.
        let Some(Commit { generation, query }) = commit else {
            return;
        };

        let sent_with = inner.reporter.sending_credential();
        let request = ResourceQuery::search(&query).with_limit(inner.limit);
        tracing::debug!(generation, query = %query, "search committed");

        let result = tokio::select! {
            _ = inner.shutdown.cancelled() => return,
            result = timeout(inner.request_timeout, inner.api.list_resources(&request)) => {
                result.unwrap_or_else(|_| Err(ApiError::timeout(inner.request_timeout)))
            }
        };
        if inner.shutdown.is_cancelled() {
            return;
        }

        match result {
            Ok(results) => {
                let count = results.len();
                let applied = inner
                    .state
                    .send_if_modified(move |state| state.apply(generation, results));
                if applied {
                    tracing::debug!(generation, count, "search results applied");
                } else {
                    tracing::debug!(generation, "discarding stale search response");
                }
            }
            Err(error) => {
                let message = user_message(&error);
                let applied = inner
                    .state
                    .send_if_modified(move |state| state.fail(generation, message));
                if !applied {
                    tracing::debug!(generation, error = %error, "discarding stale search failure");
                    return;
                }
                tracing::warn!(generation, error = %error, "search request failed");
                inner
                    .reporter
                    .end_session_if_rejected(&error, sent_with.as_ref())
                    .await;
            }
        }
    }
}

impl Drop for DebouncedQuery {
    fn drop(&mut self) {
        self.inner.shutdown.cancel();
    }
}
