//! HTTP gateway to the TechVault backend.
//!
//! The single outbound channel. Every request reads the credential from the
//! `CredentialSource` at send time; nothing is cached at construction. The
//! gateway never retries and never touches the session itself.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::domain::foundation::{ResourceId, StarRating};
use crate::domain::resource::{Mentor, Resource, SkillLevel, Technology, UserProfile};
use crate::ports::{
    ApiError, AuthResponse, CredentialSource, DevLoginRequest, FavoriteStatus, RateRequest,
    RatingSummary, ResourceQuery, TechVaultApi, TelegramWidgetUser,
};

/// reqwest-backed implementation of [`TechVaultApi`].
pub struct HttpGateway {
    client: Client,
    base_url: String,
    timeout: Duration,
    credentials: Arc<dyn CredentialSource>,
}

impl HttpGateway {
    /// Builds the gateway. Fails only if the HTTP client cannot be created.
    pub fn new(config: &ApiConfig, credentials: Arc<dyn CredentialSource>) -> Result<Self, ApiError> {
        let timeout = config.request_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base().to_string(),
            timeout,
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Starts a request, attaching the bearer credential if one exists now.
    fn request(&self, method: Method, path: &str) -> (RequestBuilder, bool) {
        let builder = self.client.request(method, self.url(path));
        match self.credentials.current_credential() {
            Some(credential) => (builder.bearer_auth(credential.expose()), true),
            None => (builder, false),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let (builder, authenticated) = self.request(Method::GET, path);
        let builder = if query.is_empty() {
            builder
        } else {
            builder.query(query)
        };
        self.send(builder, Method::GET, path, authenticated).await
    }

    async fn post<B, T>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let (builder, authenticated) = self.request(Method::POST, path);
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        self.send(builder, Method::POST, path, authenticated).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: Method,
        path: &str,
        authenticated: bool,
    ) -> Result<T, ApiError> {
        tracing::debug!(%method, path, authenticated, "api request");

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = ApiError::from_status(status.as_u16(), extract_detail(&body));
            tracing::debug!(%method, path, status = status.as_u16(), error = %error, "api request rejected");
            return Err(error);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(%method, path, error = %e, "api response did not match schema");
            ApiError::Decode(format!("{} {}: {}", method, path, e))
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::timeout(self.timeout)
        } else if e.is_connect() {
            ApiError::Network(format!("connection failed: {}", e))
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Pulls the message out of a FastAPI error body.
///
/// `{"detail": "..."}` yields the string; validation errors
/// (`{"detail": [{"msg": "..."}, ...]}`) yield the messages joined by `"; "`.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    match parsed.get("detail")? {
        serde_json::Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

#[async_trait]
impl TechVaultApi for HttpGateway {
    async fn login_telegram(&self, user: &TelegramWidgetUser) -> Result<AuthResponse, ApiError> {
        self.post("/auth/telegram", Some(user)).await
    }

    async fn dev_login(&self, request: &DevLoginRequest) -> Result<AuthResponse, ApiError> {
        self.post("/auth/dev-login", Some(request)).await
    }

    async fn list_resources(&self, query: &ResourceQuery) -> Result<Vec<Resource>, ApiError> {
        self.get("/resources", &query.to_pairs()).await
    }

    async fn get_resource(&self, id: ResourceId) -> Result<Resource, ApiError> {
        self.get(&format!("/resources/{}", id), &[]).await
    }

    async fn toggle_favorite(&self, id: ResourceId) -> Result<FavoriteStatus, ApiError> {
        self.post::<(), _>(&format!("/resources/{}/favorite", id), None)
            .await
    }

    async fn rate_resource(
        &self,
        id: ResourceId,
        rating: StarRating,
    ) -> Result<RatingSummary, ApiError> {
        let body = RateRequest { value: rating };
        self.post(&format!("/resources/{}/rate", id), Some(&body))
            .await
    }

    async fn recommendations(&self) -> Result<Vec<Resource>, ApiError> {
        self.get("/recommendations", &[]).await
    }

    async fn favorites(&self) -> Result<Vec<Resource>, ApiError> {
        self.get("/favorites", &[]).await
    }

    async fn team_favorites(&self) -> Result<Vec<Resource>, ApiError> {
        self.get("/team-favorites", &[]).await
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.get("/profile", &[]).await
    }

    async fn mentors(&self) -> Result<Vec<Mentor>, ApiError> {
        self.get("/reference/mentors", &[]).await
    }

    async fn technologies(&self) -> Result<Vec<Technology>, ApiError> {
        self.get("/reference/technologies", &[]).await
    }

    async fn skill_levels(&self) -> Result<Vec<SkillLevel>, ApiError> {
        self.get("/reference/skill-levels", &[]).await
    }
}
