//! Debounced search query state.
//!
//! All transitions are synchronous and pure; the async driver in
//! `application::search` only decides *when* to call them.
//!
//! # Invariants
//!
//! - `generation` increases on every commit and every clear
//! - `results` is only overwritten by a response tagged with the current
//!   `generation`
//! - a commit only happens for the latest input revision

use crate::domain::resource::Resource;

/// Lifecycle phase of the search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    /// Empty input, no results shown.
    Idle,
    /// Input changed; waiting out the quiet period.
    Debouncing,
    /// Request for the committed query is in flight.
    Pending,
    /// Results reflect the last committed query.
    Settled,
}

impl QueryPhase {
    /// Clearing and editing are allowed from anywhere; only a debounced
    /// query can go pending, and only a pending one can settle.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        use QueryPhase::*;
        matches!(
            (self, target),
            (_, Idle) | (_, Debouncing) | (Debouncing, Pending) | (Pending, Settled)
        )
    }
}

/// What an input edit requires from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChange {
    /// Input became blank; state already reset to Idle.
    Cleared,
    /// Start (or restart) the quiet-period timer for this revision.
    Debounce { revision: u64 },
}

/// A committed query to send, tagged with its generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub generation: u64,
    pub query: String,
}

/// Search box state. Generic over the result item so the ordering rules
/// can be exercised without building full resources.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T = Resource> {
    raw_input: String,
    committed_query: String,
    generation: u64,
    results: Vec<T>,
    pending: bool,
    phase: QueryPhase,
    input_revision: u64,
    error: Option<String>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            raw_input: String::new(),
            committed_query: String::new(),
            generation: 0,
            results: Vec::new(),
            pending: false,
            phase: QueryPhase::Idle,
            input_revision: 0,
            error: None,
        }
    }
}

impl<T> QueryState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn committed_query(&self) -> &str {
        &self.committed_query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn results(&self) -> &[T] {
        &self.results
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn phase(&self) -> QueryPhase {
        self.phase
    }

    pub fn input_revision(&self) -> u64 {
        self.input_revision
    }

    /// Message of the last failed request for the current generation.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True once a non-blank query has been committed.
    pub fn has_searched(&self) -> bool {
        !self.committed_query.is_empty()
    }

    /// Settled with nothing to show ("No results found").
    pub fn is_empty_result(&self) -> bool {
        self.phase == QueryPhase::Settled && self.results.is_empty()
    }

    /// Records a new raw input.
    ///
    /// Blank input resets to Idle synchronously and bumps the generation so
    /// any in-flight response is discarded on arrival.
    pub fn edit(&mut self, input: impl Into<String>) -> InputChange {
        self.raw_input = input.into();
        self.input_revision += 1;

        if self.raw_input.trim().is_empty() {
            self.enter(QueryPhase::Idle);
            self.generation += 1;
            self.committed_query.clear();
            self.results.clear();
            self.pending = false;
            self.error = None;
            return InputChange::Cleared;
        }

        self.enter(QueryPhase::Debouncing);
        InputChange::Debounce {
            revision: self.input_revision,
        }
    }

    /// Commits the input if `revision` is still the latest and the quiet
    /// period was not interrupted.
    pub fn commit(&mut self, revision: u64) -> Option<Commit> {
        if revision != self.input_revision || self.phase != QueryPhase::Debouncing {
            return None;
        }
        self.generation += 1;
        self.committed_query = self.raw_input.trim().to_string();
        self.pending = true;
        self.error = None;
        self.enter(QueryPhase::Pending);
        Some(Commit {
            generation: self.generation,
            query: self.committed_query.clone(),
        })
    }

    /// Applies a response. Returns false (and changes nothing) when the
    /// response belongs to a superseded generation.
    pub fn apply(&mut self, generation: u64, results: Vec<T>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.results = results;
        self.pending = false;
        self.error = None;
        self.settle();
        true
    }

    /// Records a failed request: results for that generation are emptied.
    pub fn fail(&mut self, generation: u64, message: impl Into<String>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.results.clear();
        self.pending = false;
        self.error = Some(message.into());
        self.settle();
        true
    }

    /// Makes every outstanding request stale without touching the input.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.input_revision += 1;
        self.pending = false;
    }

    fn settle(&mut self) {
        // Input may already have moved on (Debouncing); only a Pending
        // search settles.
        if self.phase == QueryPhase::Pending {
            self.enter(QueryPhase::Settled);
        }
    }

    fn enter(&mut self, next: QueryPhase) {
        debug_assert!(
            self.phase.can_transition_to(&next),
            "invalid query phase transition {:?} -> {:?}",
            self.phase,
            next
        );
        self.phase = next;
    }
}
