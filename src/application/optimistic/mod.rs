//! Optimistic mutations.
//!
//! A mutation is reflected in the view before the server confirms it:
//!
//! 1. capture a snapshot of exactly the fields the mutation touches
//! 2. apply the prediction synchronously (before any request is issued)
//! 3. send the request
//! 4. on success, overwrite the prediction with the server's values
//! 5. on failure, restore that mutation's own snapshot and post a notice
//!
//! Settling is guarded per scope: if a newer mutation on the same field has
//! started, the older one neither reconciles nor rolls back over it.

mod cell;
mod favorite;
mod rating;

pub use cell::OptimisticCell;
pub use favorite::ToggleFavorite;
pub use rating::{RatingSnapshot, SubmitRating};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use self::cell::Settle;
use super::failure::FailureReporter;
use super::notices::NoticeKind;
use crate::domain::session::Credential;
use crate::ports::{ApiError, TechVaultApi};

/// One kind of optimistic change.
#[async_trait]
pub trait OptimisticMutation: Send + Sync + 'static {
    type State: Clone + Send + Sync + 'static;
    type Snapshot: Send + 'static;
    type Response: Send + 'static;

    /// Field group this mutation owns; mutations with the same scope on the
    /// same cell supersede each other.
    fn scope(&self) -> &'static str;

    /// Short action name for notices ("update favorite").
    fn describe(&self) -> &'static str;

    fn capture(&self, state: &Self::State) -> Self::Snapshot;

    fn predict(&self, state: &mut Self::State);

    async fn send(&self, api: &dyn TechVaultApi) -> Result<Self::Response, ApiError>;

    fn reconcile(&self, state: &mut Self::State, response: Self::Response);

    fn restore(&self, state: &mut Self::State, snapshot: Self::Snapshot);
}

/// How a mutation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Server accepted; state now holds the server's values.
    Confirmed,
    /// Request failed; state restored to this mutation's snapshot.
    RolledBack { error: ApiError },
    /// A newer mutation on the same scope owns the state now.
    Superseded { error: Option<ApiError> },
    /// The owning view went away; state was left alone.
    Detached,
}

impl MutationOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, MutationOutcome::Confirmed)
    }
}

/// Runs optimistic mutations against the backend.
#[derive(Clone)]
pub struct OptimisticMutator {
    api: Arc<dyn TechVaultApi>,
    timeout: Duration,
    reporter: FailureReporter,
}

impl OptimisticMutator {
    pub fn new(api: Arc<dyn TechVaultApi>, timeout: Duration, reporter: FailureReporter) -> Self {
        Self {
            api,
            timeout,
            reporter,
        }
    }

    /// Captures the snapshot and applies the prediction now; the request is
    /// sent when the returned handle is finished.
    pub fn start<M: OptimisticMutation>(
        &self,
        cell: &OptimisticCell<M::State>,
        mutation: M,
    ) -> InFlight<M> {
        let mut snapshot = None;
        let ticket = cell.begin(mutation.scope(), |state| {
            snapshot = Some(mutation.capture(state));
            mutation.predict(state);
        });
        let pending = ticket.zip(snapshot);

        InFlight {
            mutator: self.clone(),
            cell: cell.clone(),
            mutation,
            pending,
            sent_with: self.reporter.sending_credential(),
        }
    }

    /// `start` followed by `finish`.
    pub async fn apply<M: OptimisticMutation>(
        &self,
        cell: &OptimisticCell<M::State>,
        mutation: M,
    ) -> MutationOutcome {
        self.start(cell, mutation).finish().await
    }
}

/// A mutation whose prediction is visible and whose request is not yet
/// settled.
#[must_use = "the request is only sent when the mutation is finished"]
pub struct InFlight<M: OptimisticMutation> {
    mutator: OptimisticMutator,
    cell: OptimisticCell<M::State>,
    mutation: M,
    pending: Option<(u64, M::Snapshot)>,
    sent_with: Option<Credential>,
}

impl<M: OptimisticMutation> InFlight<M> {
    /// Sends the request and settles the cell.
    pub async fn finish(self) -> MutationOutcome {
        let InFlight {
            mutator,
            cell,
            mutation,
            pending,
            sent_with,
        } = self;
        let Some((ticket, snapshot)) = pending else {
            return MutationOutcome::Detached;
        };
        let scope = mutation.scope();
        let detached = cell.cancellation();

        let result = tokio::select! {
            _ = detached.cancelled() => {
                tracing::debug!(scope, "view detached, abandoning mutation");
                return MutationOutcome::Detached;
            }
            result = tokio::time::timeout(mutator.timeout, mutation.send(mutator.api.as_ref())) => {
                result.unwrap_or_else(|_| Err(ApiError::timeout(mutator.timeout)))
            }
        };

        match result {
            Ok(response) => match cell.settle(scope, ticket, |state| mutation.reconcile(state, response)) {
                Settle::Applied => MutationOutcome::Confirmed,
                Settle::Superseded => {
                    tracing::debug!(scope, "mutation confirmed after a newer one started");
                    MutationOutcome::Superseded { error: None }
                }
                Settle::Detached => MutationOutcome::Detached,
            },
            Err(error) => {
                let settle = cell.settle(scope, ticket, |state| mutation.restore(state, snapshot));
                tracing::warn!(
                    scope,
                    error = %error,
                    rolled_back = settle == Settle::Applied,
                    "optimistic mutation failed"
                );
                if settle == Settle::Detached {
                    return MutationOutcome::Detached;
                }
                let action = format!("Could not {}", mutation.describe());
                mutator
                    .reporter
                    .report(NoticeKind::Mutation, &action, &error, sent_with.as_ref())
                    .await;
                match settle {
                    Settle::Applied => MutationOutcome::RolledBack { error },
                    _ => MutationOutcome::Superseded { error: Some(error) },
                }
            }
        }
    }
}
