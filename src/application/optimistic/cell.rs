//! Shared, observable state that optimistic mutations act on.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Outcome of trying to settle a mutation against the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Settle {
    Applied,
    /// A newer mutation on the same scope (or a `replace`) happened since.
    Superseded,
    Detached,
}

#[derive(Debug, Default)]
struct Tickets {
    next: u64,
    latest: HashMap<&'static str, u64>,
}

#[derive(Debug)]
struct Shared<S> {
    value: watch::Sender<S>,
    tickets: Mutex<Tickets>,
    detached: CancellationToken,
}

/// View-owned state (e.g. a resource's interaction facet) shared with the
/// mutations in flight against it. Clones share the same cell.
///
/// Each mutation takes a ticket for its scope when it starts; only the
/// holder of the latest ticket may settle (reconcile or roll back). Once
/// detached, no mutation touches the value again.
#[derive(Debug)]
pub struct OptimisticCell<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for OptimisticCell<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: Clone> OptimisticCell<S> {
    pub fn new(value: S) -> Self {
        let (value, _) = watch::channel(value);
        Self {
            shared: Arc::new(Shared {
                value,
                tickets: Mutex::new(Tickets::default()),
                detached: CancellationToken::new(),
            }),
        }
    }

    pub fn get(&self) -> S {
        self.shared.value.borrow().clone()
    }

    /// Reads without cloning.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.shared.value.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.shared.value.subscribe()
    }

    /// Replaces the whole value (e.g. after a reload). Mutations in flight
    /// become superseded and will not settle over it.
    pub fn replace(&self, value: S) {
        let mut tickets = self.tickets();
        tickets.latest.clear();
        self.shared.value.send_replace(value);
    }

    /// Marks the owning view as gone. In-flight mutations are cancelled and
    /// will never write to the cell.
    pub fn detach(&self) {
        self.shared.detached.cancel();
    }

    pub fn is_detached(&self) -> bool {
        self.shared.detached.is_cancelled()
    }

    pub(crate) fn cancellation(&self) -> CancellationToken {
        self.shared.detached.clone()
    }

    /// Takes a ticket for `scope` and applies `f` in the same critical
    /// section, so the prediction and the ticket are never out of step.
    pub(crate) fn begin(&self, scope: &'static str, f: impl FnOnce(&mut S)) -> Option<u64> {
        if self.is_detached() {
            return None;
        }
        let mut tickets = self.tickets();
        tickets.next += 1;
        let ticket = tickets.next;
        tickets.latest.insert(scope, ticket);
        self.shared.value.send_modify(f);
        Some(ticket)
    }

    /// Applies `f` only if `ticket` is still the latest for `scope`.
    pub(crate) fn settle(&self, scope: &'static str, ticket: u64, f: impl FnOnce(&mut S)) -> Settle {
        let tickets = self.tickets();
        if self.is_detached() {
            return Settle::Detached;
        }
        if tickets.latest.get(scope) != Some(&ticket) {
            return Settle::Superseded;
        }
        self.shared.value.send_modify(f);
        Settle::Applied
    }

    fn tickets(&self) -> MutexGuard<'_, Tickets> {
        self.shared
            .tickets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
