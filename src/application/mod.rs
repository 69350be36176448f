//! Application layer - stateful services between views and ports.
//!
//! Owns the session, the optimistic mutation protocol, the debounced search
//! pipeline and the failure boundary that turns errors into notices.

pub mod context;
pub mod failure;
pub mod handlers;
pub mod notices;
pub mod optimistic;
pub mod search;
pub mod session_store;

pub use context::ClientContext;
pub use failure::{user_message, FailureReporter};
pub use handlers::{AuthFailure, LoginHandler, ResourceDetails, ResourceDetailsLoader};
pub use notices::{Notice, NoticeBoard, NoticeKind};
pub use optimistic::{
    InFlight, MutationOutcome, OptimisticCell, OptimisticMutation, OptimisticMutator,
    SubmitRating, ToggleFavorite,
};
pub use search::DebouncedQuery;
pub use session_store::{SessionKeys, SessionStore};
