//! Application handlers.
//!
//! Flows that combine the backend with session state: signing in and out,
//! and loading the resource detail view.

mod login;
mod resource_details;

pub use login::{AuthFailure, LoginHandler};
pub use resource_details::{ResourceDetails, ResourceDetailsLoader};
