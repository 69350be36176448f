//! Client routes.

use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ResourceId, ValidationError};

/// Every screen the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Home,
    Recommendations,
    Favorites,
    TeamFavorites,
    VaultSearch,
    Profile,
    ResourceDetails(ResourceId),
}

impl Route {
    /// Parses a location path. Query strings and fragments are ignored, as is
    /// a trailing slash.
    pub fn parse(path: &str) -> Result<Self, ValidationError> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            other => other,
        };

        let route = match trimmed {
            "/" => Route::Home,
            "/login" => Route::Login,
            "/recommendations" => Route::Recommendations,
            "/favorites" => Route::Favorites,
            "/team-favorites" => Route::TeamFavorites,
            "/vault-search" => Route::VaultSearch,
            "/profile" => Route::Profile,
            other => {
                let id = other
                    .strip_prefix("/resources/")
                    .filter(|rest| !rest.contains('/'))
                    .ok_or_else(|| ValidationError::invalid_format("route", "unknown path"))?;
                let id = ResourceId::from_str(id)
                    .map_err(|e| ValidationError::invalid_format("route", e.to_string()))?;
                Route::ResourceDetails(id)
            }
        };
        Ok(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Home => "/".to_string(),
            Route::Recommendations => "/recommendations".to_string(),
            Route::Favorites => "/favorites".to_string(),
            Route::TeamFavorites => "/team-favorites".to_string(),
            Route::VaultSearch => "/vault-search".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::ResourceDetails(id) => format!("/resources/{}", id),
        }
    }

    /// Only the login screen is reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}
