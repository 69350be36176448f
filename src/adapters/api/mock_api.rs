//! Mock TechVault API for testing.
//!
//! Provides a configurable in-memory implementation of the TechVaultApi
//! port, allowing tests and demos to run without a backend.
//!
//! # Features
//!
//! - Seeded resources, reference data and login responses
//! - Per-query search results and per-endpoint simulated latency
//! - Error injection (one-shot or persistent, per endpoint)
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let api = MockTechVaultApi::new()
//!     .with_resource(resource)
//!     .with_delay(Endpoint::ToggleFavorite, Duration::from_millis(100))
//!     .failing_once(Endpoint::RateResource, ApiError::Network("offline".into()));
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::{ResourceId, StarRating};
use crate::domain::resource::{
    AverageRating, Mentor, Resource, SkillLevel, Technology, UserProfile,
};
use crate::ports::{
    ApiError, AuthResponse, DevLoginRequest, FavoriteStatus, RatingSummary, ResourceQuery,
    TechVaultApi, TelegramWidgetUser,
};

/// Endpoints of the backend contract, for delays and error injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    LoginTelegram,
    DevLogin,
    ListResources,
    GetResource,
    ToggleFavorite,
    RateResource,
    Recommendations,
    Favorites,
    TeamFavorites,
    Profile,
    Mentors,
    Technologies,
    SkillLevels,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    LoginTelegram { telegram_id: i64 },
    DevLogin { telegram_id: i64 },
    ListResources(ResourceQuery),
    GetResource(ResourceId),
    ToggleFavorite(ResourceId),
    RateResource(ResourceId, StarRating),
    Recommendations,
    Favorites,
    TeamFavorites,
    Profile,
    Mentors,
    Technologies,
    SkillLevels,
}

#[derive(Debug, Default)]
struct MockState {
    resources: HashMap<ResourceId, Resource>,
    search_results: HashMap<String, Vec<Resource>>,
    search_delays: HashMap<String, Duration>,
    auth: Option<AuthResponse>,
    profile: Option<UserProfile>,
    technologies: Vec<Technology>,
    skill_levels: Vec<SkillLevel>,
    mentors: Vec<Mentor>,
    delays: HashMap<Endpoint, Duration>,
    one_shot_errors: HashMap<Endpoint, VecDeque<ApiError>>,
    persistent_errors: HashMap<Endpoint, ApiError>,
    calls: Vec<MockCall>,
}

/// Mock backend for testing.
#[derive(Debug, Clone, Default)]
pub struct MockTechVaultApi {
    state: Arc<Mutex<MockState>>,
}

impl MockTechVaultApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds a resource served by `get_resource`, `list_resources` and the
    /// mutation endpoints.
    pub fn with_resource(self, resource: Resource) -> Self {
        self.lock().resources.insert(resource.id, resource);
        self
    }

    /// Results for an exact (trimmed) search term.
    pub fn with_search_results(self, query: &str, results: Vec<Resource>) -> Self {
        self.lock()
            .search_results
            .insert(query.trim().to_string(), results);
        self
    }

    /// Latency for one search term, on top of the endpoint delay.
    pub fn with_search_delay(self, query: &str, delay: Duration) -> Self {
        self.lock()
            .search_delays
            .insert(query.trim().to_string(), delay);
        self
    }

    /// Response returned by both login endpoints.
    pub fn with_auth(self, auth: AuthResponse) -> Self {
        self.lock().auth = Some(auth);
        self
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.lock().profile = Some(profile);
        self
    }

    pub fn with_technologies(self, technologies: Vec<Technology>) -> Self {
        self.lock().technologies = technologies;
        self
    }

    pub fn with_skill_levels(self, skill_levels: Vec<SkillLevel>) -> Self {
        self.lock().skill_levels = skill_levels;
        self
    }

    pub fn with_mentors(self, mentors: Vec<Mentor>) -> Self {
        self.lock().mentors = mentors;
        self
    }

    /// Simulated latency for every call to `endpoint`.
    pub fn with_delay(self, endpoint: Endpoint, delay: Duration) -> Self {
        self.lock().delays.insert(endpoint, delay);
        self
    }

    /// Fails the next call to `endpoint` with `error`.
    pub fn failing_once(self, endpoint: Endpoint, error: ApiError) -> Self {
        self.lock()
            .one_shot_errors
            .entry(endpoint)
            .or_default()
            .push_back(error);
        self
    }

    /// Fails every call to `endpoint` until [`MockTechVaultApi::recover`].
    pub fn failing(self, endpoint: Endpoint, error: ApiError) -> Self {
        self.set_failing(endpoint, error);
        self
    }

    /// Non-builder form of [`MockTechVaultApi::failing`].
    pub fn set_failing(&self, endpoint: Endpoint, error: ApiError) {
        self.lock().persistent_errors.insert(endpoint, error);
    }

    /// Clears persistent errors for `endpoint`.
    pub fn recover(&self, endpoint: Endpoint) {
        self.lock().persistent_errors.remove(&endpoint);
    }

    /// Server-side copy of a seeded resource.
    pub fn stored_resource(&self, id: ResourceId) -> Option<Resource> {
        self.lock().resources.get(&id).cloned()
    }

    /// All recorded calls, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Records the call, waits out the configured latency, then returns
    /// any injected error.
    async fn enter(&self, endpoint: Endpoint, call: MockCall, extra: Duration) -> Result<(), ApiError> {
        let delay = {
            let mut state = self.lock();
            state.calls.push(call);
            state.delays.get(&endpoint).copied().unwrap_or_default() + extra
        };
        if !delay.is_zero() {
            sleep(delay).await;
        }

        let mut state = self.lock();
        if let Some(error) = state
            .one_shot_errors
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }
        if let Some(error) = state.persistent_errors.get(&endpoint) {
            return Err(error.clone());
        }
        Ok(())
    }

    fn not_found(id: ResourceId) -> ApiError {
        ApiError::NotFound {
            detail: Some(format!("Resource {} not found", id)),
        }
    }

    fn login_response(&self) -> Result<AuthResponse, ApiError> {
        self.lock().auth.clone().ok_or(ApiError::Unauthorized {
            detail: Some("Invalid Telegram hash".to_string()),
        })
    }
}

#[async_trait]
impl TechVaultApi for MockTechVaultApi {
    async fn login_telegram(&self, user: &TelegramWidgetUser) -> Result<AuthResponse, ApiError> {
        self.enter(
            Endpoint::LoginTelegram,
            MockCall::LoginTelegram {
                telegram_id: user.id,
            },
            Duration::ZERO,
        )
        .await?;
        self.login_response()
    }

    async fn dev_login(&self, request: &DevLoginRequest) -> Result<AuthResponse, ApiError> {
        self.enter(
            Endpoint::DevLogin,
            MockCall::DevLogin {
                telegram_id: request.telegram_id,
            },
            Duration::ZERO,
        )
        .await?;
        self.login_response()
    }

    async fn list_resources(&self, query: &ResourceQuery) -> Result<Vec<Resource>, ApiError> {
        let term = query.search.clone().unwrap_or_default();
        let extra = self
            .lock()
            .search_delays
            .get(&term)
            .copied()
            .unwrap_or_default();
        self.enter(
            Endpoint::ListResources,
            MockCall::ListResources(query.clone()),
            extra,
        )
        .await?;

        let state = self.lock();
        let mut results = match state.search_results.get(&term) {
            Some(results) => results.clone(),
            None => {
                let needle = term.to_lowercase();
                let mut matches: Vec<Resource> = state
                    .resources
                    .values()
                    .filter(|r| needle.is_empty() || r.title.to_lowercase().contains(&needle))
                    .cloned()
                    .collect();
                matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                matches
            }
        };
        if let Some(limit) = query.limit {
            results.truncate(limit as usize);
        }
        Ok(results)
    }

    async fn get_resource(&self, id: ResourceId) -> Result<Resource, ApiError> {
        self.enter(Endpoint::GetResource, MockCall::GetResource(id), Duration::ZERO)
            .await?;
        self.stored_resource(id).ok_or_else(|| Self::not_found(id))
    }

    async fn toggle_favorite(&self, id: ResourceId) -> Result<FavoriteStatus, ApiError> {
        self.enter(
            Endpoint::ToggleFavorite,
            MockCall::ToggleFavorite(id),
            Duration::ZERO,
        )
        .await?;
        let mut state = self.lock();
        let resource = state.resources.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        resource.is_favorite = !resource.is_favorite;
        Ok(FavoriteStatus {
            is_favorite: resource.is_favorite,
        })
    }

    async fn rate_resource(
        &self,
        id: ResourceId,
        rating: StarRating,
    ) -> Result<RatingSummary, ApiError> {
        self.enter(
            Endpoint::RateResource,
            MockCall::RateResource(id, rating),
            Duration::ZERO,
        )
        .await?;
        let mut state = self.lock();
        let resource = state.resources.get_mut(&id).ok_or_else(|| Self::not_found(id))?;

        // Re-rating replaces the previous score rather than adding one.
        let count = resource.ratings_count as f64;
        let total = resource.average_rating.value() * count;
        let (total, count) = match resource.user_rating {
            Some(previous) => (total - previous.value() as f64 + rating.value() as f64, count),
            None => (total + rating.value() as f64, count + 1.0),
        };
        let average = ((total / count) * 100.0).round() / 100.0;
        resource.average_rating = AverageRating::new(average.clamp(0.0, 5.0))
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        resource.ratings_count = count as u32;
        resource.user_rating = Some(rating);

        Ok(RatingSummary {
            average_rating: resource.average_rating,
            ratings_count: resource.ratings_count,
            user_rating: rating,
        })
    }

    async fn recommendations(&self) -> Result<Vec<Resource>, ApiError> {
        self.enter(Endpoint::Recommendations, MockCall::Recommendations, Duration::ZERO)
            .await?;
        let mut resources: Vec<Resource> = self.lock().resources.values().cloned().collect();
        resources.sort_by(|a, b| {
            b.average_rating
                .value()
                .total_cmp(&a.average_rating.value())
        });
        Ok(resources)
    }

    async fn favorites(&self) -> Result<Vec<Resource>, ApiError> {
        self.enter(Endpoint::Favorites, MockCall::Favorites, Duration::ZERO)
            .await?;
        Ok(self
            .lock()
            .resources
            .values()
            .filter(|r| r.is_favorite)
            .cloned()
            .collect())
    }

    async fn team_favorites(&self) -> Result<Vec<Resource>, ApiError> {
        self.enter(Endpoint::TeamFavorites, MockCall::TeamFavorites, Duration::ZERO)
            .await?;
        Ok(self
            .lock()
            .resources
            .values()
            .filter(|r| r.user_rating.map(|s| s.value()) == Some(StarRating::MAX))
            .cloned()
            .collect())
    }

    async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.enter(Endpoint::Profile, MockCall::Profile, Duration::ZERO)
            .await?;
        self.lock()
            .profile
            .clone()
            .ok_or(ApiError::NotFound { detail: None })
    }

    async fn mentors(&self) -> Result<Vec<Mentor>, ApiError> {
        self.enter(Endpoint::Mentors, MockCall::Mentors, Duration::ZERO)
            .await?;
        Ok(self.lock().mentors.clone())
    }

    async fn technologies(&self) -> Result<Vec<Technology>, ApiError> {
        self.enter(Endpoint::Technologies, MockCall::Technologies, Duration::ZERO)
            .await?;
        Ok(self.lock().technologies.clone())
    }

    async fn skill_levels(&self) -> Result<Vec<SkillLevel>, ApiError> {
        self.enter(Endpoint::SkillLevels, MockCall::SkillLevels, Duration::ZERO)
            .await?;
        Ok(self.lock().skill_levels.clone())
    }
}
