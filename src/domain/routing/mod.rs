//! Routing module - client routes and the session gate in front of them.

mod gate;
mod route;

pub use gate::{evaluate, post_login_destination, RouteDecision};
pub use route::Route;
