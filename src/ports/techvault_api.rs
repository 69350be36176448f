//! TechVault API Port - Interface to the TechVault backend.
//!
//! Every response is decoded into a typed schema by the implementation, so
//! callers never see raw JSON. Implementations attach the current bearer
//! credential (if any) to every call and never retry.
//!
//! # Example
//!
//! ```ignore
//! let resources = api.list_resources(&ResourceQuery::search("tokio")).await?;
//! let status = api.toggle_favorite(resources[0].id).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::{ResourceId, StarRating};
use crate::domain::resource::{
    AverageRating, Mentor, Resource, SkillLevel, Technology, UserProfile,
};
use crate::domain::session::UserSummary;

/// Port for the TechVault backend HTTP contract.
#[async_trait]
pub trait TechVaultApi: Send + Sync {
    /// `POST /auth/telegram` with the login widget payload.
    async fn login_telegram(&self, user: &TelegramWidgetUser) -> Result<AuthResponse, ApiError>;

    /// `POST /auth/dev-login` (development backends only).
    async fn dev_login(&self, request: &DevLoginRequest) -> Result<AuthResponse, ApiError>;

    /// `GET /resources`
    async fn list_resources(&self, query: &ResourceQuery) -> Result<Vec<Resource>, ApiError>;

    /// `GET /resources/{id}`
    async fn get_resource(&self, id: ResourceId) -> Result<Resource, ApiError>;

    /// `POST /resources/{id}/favorite`; returns the new server-side flag.
    async fn toggle_favorite(&self, id: ResourceId) -> Result<FavoriteStatus, ApiError>;

    /// `POST /resources/{id}/rate`; returns the recomputed aggregates.
    async fn rate_resource(
        &self,
        id: ResourceId,
        rating: StarRating,
    ) -> Result<RatingSummary, ApiError>;

    /// `GET /recommendations`
    async fn recommendations(&self) -> Result<Vec<Resource>, ApiError>;

    /// `GET /favorites`
    async fn favorites(&self) -> Result<Vec<Resource>, ApiError>;

    /// `GET /team-favorites`
    async fn team_favorites(&self) -> Result<Vec<Resource>, ApiError>;

    /// `GET /profile`
    async fn profile(&self) -> Result<UserProfile, ApiError>;

    /// `GET /reference/mentors`
    async fn mentors(&self) -> Result<Vec<Mentor>, ApiError>;

    /// `GET /reference/technologies`
    async fn technologies(&self) -> Result<Vec<Technology>, ApiError>;

    /// `GET /reference/skill-levels`
    async fn skill_levels(&self) -> Result<Vec<SkillLevel>, ApiError>;
}

/// Payload produced by the Telegram login widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramWidgetUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub auth_date: i64,
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevLoginRequest {
    pub telegram_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Response of both login endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: UserSummary,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FavoriteStatus {
    pub is_favorite: bool,
}

/// Authoritative aggregates after a rating.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RatingSummary {
    pub average_rating: AverageRating,
    pub ratings_count: u32,
    pub user_rating: StarRating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateRequest {
    pub value: StarRating,
}

/// Query parameters for `GET /resources`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceQuery {
    pub search: Option<String>,
    pub limit: Option<u32>,
}

impl ResourceQuery {
    /// Query for a search term. The term is trimmed; blank terms are omitted.
    pub fn search(text: &str) -> Self {
        let trimmed = text.trim();
        Self {
            search: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// Query-string pairs, omitting unset parameters.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// Failures talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// 401: credential missing, invalid or expired (or login rejected).
    #[error("unauthorized{}", fmt_detail(.detail))]
    Unauthorized { detail: Option<String> },

    /// 403
    #[error("forbidden{}", fmt_detail(.detail))]
    Forbidden { detail: Option<String> },

    /// 404
    #[error("not found{}", fmt_detail(.detail))]
    NotFound { detail: Option<String> },

    /// Any other non-success status.
    #[error("server returned {status}{}", fmt_detail(.detail))]
    Status { status: u16, detail: Option<String> },

    /// Connection refused, DNS failure, reset.
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Response body did not match the expected schema.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Client could not be built (bad base URL, TLS setup).
    #[error("client configuration error: {0}")]
    Configuration(String),
}

fn fmt_detail(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}

impl ApiError {
    /// Maps a non-success HTTP status to an error.
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        match status {
            401 => ApiError::Unauthorized { detail },
            403 => ApiError::Forbidden { detail },
            404 => ApiError::NotFound { detail },
            _ => ApiError::Status { status, detail },
        }
    }

    /// Server-provided message, when the backend sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail }
            | ApiError::Forbidden { detail }
            | ApiError::NotFound { detail }
            | ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Error for a request abandoned after `limit`.
    pub fn timeout(limit: Duration) -> Self {
        ApiError::Timeout {
            timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Failures that may succeed if the user tries again later.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout { .. } => true,
            ApiError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_maps_well_known_codes() {
        assert!(ApiError::from_status(401, None).is_unauthorized());
        assert!(matches!(ApiError::from_status(403, None), ApiError::Forbidden { .. }));
        assert!(matches!(ApiError::from_status(404, None), ApiError::NotFound { .. }));
        assert_eq!(
            ApiError::from_status(400, Some("Set team to see team favorites".to_string())),
            ApiError::Status {
                status: 400,
                detail: Some("Set team to see team favorites".to_string())
            }
        );
    }

    #[test]
    fn detail_is_exposed_and_displayed() {
        let err = ApiError::from_status(401, Some("Invalid Telegram hash".to_string()));
        assert_eq!(err.detail(), Some("Invalid Telegram hash"));
        assert_eq!(err.to_string(), "unauthorized: Invalid Telegram hash");
        assert_eq!(ApiError::NotFound { detail: None }.to_string(), "not found");
    }

    #[test]
    fn timeout_records_the_limit_in_millis() {
        assert_eq!(
            ApiError::timeout(Duration::from_secs(15)),
            ApiError::Timeout { timeout_ms: 15_000 }
        );
        assert_eq!(
            ApiError::timeout(Duration::from_micros(2_500)),
            ApiError::Timeout { timeout_ms: 2 }
        );
        assert!(ApiError::timeout(Duration::from_millis(1)).is_transient());
    }

    #[test]
    fn transient_errors() {
        assert!(ApiError::Network("reset".into()).is_transient());
        assert!(ApiError::Timeout { timeout_ms: 100 }.is_transient());
        assert!(ApiError::from_status(503, None).is_transient());
        assert!(!ApiError::from_status(400, None).is_transient());
        assert!(!ApiError::Decode("x".into()).is_transient());
    }

    #[test]
    fn resource_query_trims_and_omits_blank_search() {
        assert_eq!(ResourceQuery::search("  tokio ").search.as_deref(), Some("tokio"));
        assert!(ResourceQuery::search("   ").search.is_none());
        assert!(ResourceQuery::search("").to_pairs().is_empty());
        assert_eq!(
            ResourceQuery::search("axum").with_limit(Some(20)).to_pairs(),
            vec![("search", "axum".to_string()), ("limit", "20".to_string())]
        );
    }

    #[test]
    fn rate_request_serializes_plain_value() {
        let body = serde_json::to_value(RateRequest {
            value: StarRating::new(4).unwrap(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "value": 4 }));
    }

    #[test]
    fn rating_summary_decodes_decimal_string() {
        let summary: RatingSummary = serde_json::from_value(serde_json::json!({
            "average_rating": "4.1",
            "ratings_count": 11,
            "user_rating": 5
        }))
        .unwrap();
        assert_eq!(summary.average_rating.value(), 4.1);
        assert_eq!(summary.ratings_count, 11);
        assert_eq!(summary.user_rating.value(), 5);
    }

    #[test]
    fn widget_user_omits_absent_optionals() {
        let body = serde_json::to_value(TelegramWidgetUser {
            id: 1,
            first_name: "Ada".into(),
            last_name: None,
            username: None,
            photo_url: None,
            auth_date: 1_700_000_000,
            hash: "abc".into(),
        })
        .unwrap();
        assert!(body.get("last_name").is_none());
        assert_eq!(body["hash"], "abc");
    }
}
