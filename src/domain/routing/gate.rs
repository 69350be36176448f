//! Route gating derived from the session.
//!
//! Pure functions only; the gate keeps no state of its own.

use super::Route;
use crate::domain::session::Session;

/// What to show for a requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Restore has not finished; show a placeholder, not an error.
    Loading,
    /// Nobody is signed in. `return_to` is where to go after login.
    RedirectToLogin { return_to: Route },
    /// Show the requested screen.
    Render(Route),
}

/// Decides whether `requested` can be shown for `session`.
pub fn evaluate(session: &Session, requested: Route) -> RouteDecision {
    if requested.is_public() {
        return RouteDecision::Render(requested);
    }
    if !session.is_ready() {
        return RouteDecision::Loading;
    }
    if !session.is_authenticated() {
        return RouteDecision::RedirectToLogin {
            return_to: requested,
        };
    }
    RouteDecision::Render(requested)
}

/// Where to navigate once a login succeeds.
pub fn post_login_destination(return_to: Option<Route>) -> Route {
    match return_to {
        Some(route) if !route.is_public() => route,
        _ => Route::Home,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ResourceId, UserId};
    use crate::domain::session::{Credential, UserSummary};
    use chrono::Utc;

    fn signed_in() -> Session {
        let user = UserSummary {
            id: UserId::new(),
            telegram_id: 1,
            username: Some("ada".to_string()),
            first_name: None,
            last_name: None,
            team_id: None,
            skill_level_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        Session::authenticated(Credential::new("T").unwrap(), user)
    }

    #[test]
    fn not_ready_shows_loading() {
        assert_eq!(
            evaluate(&Session::loading(), Route::Favorites),
            RouteDecision::Loading
        );
    }

    #[test]
    fn anonymous_redirects_with_return_location() {
        let id = ResourceId::new();
        let requested = Route::ResourceDetails(id);
        assert_eq!(
            evaluate(&Session::anonymous(), requested),
            RouteDecision::RedirectToLogin {
                return_to: requested
            }
        );
    }

    #[test]
    fn authenticated_renders_protected_route() {
        assert_eq!(
            evaluate(&signed_in(), Route::Profile),
            RouteDecision::Render(Route::Profile)
        );
    }

    #[test]
    fn login_route_renders_in_every_state() {
        for session in [Session::loading(), Session::anonymous(), signed_in()] {
            assert_eq!(
                evaluate(&session, Route::Login),
                RouteDecision::Render(Route::Login)
            );
        }
    }

    #[test]
    fn post_login_returns_to_preserved_route() {
        assert_eq!(
            post_login_destination(Some(Route::VaultSearch)),
            Route::VaultSearch
        );
        assert_eq!(post_login_destination(None), Route::Home);
        assert_eq!(post_login_destination(Some(Route::Login)), Route::Home);
    }
}
