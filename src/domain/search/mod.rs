//! Search module - generation-tagged query state for the vault search box.

mod query_state;

pub use query_state::{Commit, InputChange, QueryPhase, QueryState};
