//! Domain layer containing client state and its transition rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, star rating, errors, state machine)
//! - `session` - Credential, user summary and the session value
//! - `resource` - Typed backend schemas and the interaction facet
//! - `search` - Generation-tagged search query state
//! - `routing` - Routes and the session gate

pub mod foundation;
pub mod resource;
pub mod routing;
pub mod search;
pub mod session;
