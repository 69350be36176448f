//! Vault search: drives the generation-tagged `QueryState` with real timers
//! and requests.

mod debounced_query;

pub use debounced_query::DebouncedQuery;
