//! Star rating submission.

use async_trait::async_trait;

use super::OptimisticMutation;
use crate::domain::foundation::{ResourceId, StarRating};
use crate::domain::resource::{AverageRating, InteractionState};
use crate::ports::{ApiError, RatingSummary, TechVaultApi};

/// Shows the chosen stars immediately; aggregates come from the server.
#[derive(Debug, Clone, Copy)]
pub struct SubmitRating {
    pub id: ResourceId,
    pub rating: StarRating,
}

impl SubmitRating {
    pub fn new(id: ResourceId, rating: StarRating) -> Self {
        Self { id, rating }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RatingSnapshot {
    user_rating: Option<StarRating>,
    average_rating: AverageRating,
    ratings_count: u32,
}

#[async_trait]
impl OptimisticMutation for SubmitRating {
    type State = InteractionState;
    type Snapshot = RatingSnapshot;
    type Response = RatingSummary;

    fn scope(&self) -> &'static str {
        "rating"
    }

    fn describe(&self) -> &'static str {
        "save rating"
    }

    fn capture(&self, state: &InteractionState) -> RatingSnapshot {
        RatingSnapshot {
            user_rating: state.user_rating,
            average_rating: state.average_rating,
            ratings_count: state.ratings_count,
        }
    }

    // Aggregates are left alone until the server computes them.
    fn predict(&self, state: &mut InteractionState) {
        state.user_rating = Some(self.rating);
    }

    async fn send(&self, api: &dyn TechVaultApi) -> Result<RatingSummary, ApiError> {
        api.rate_resource(self.id, self.rating).await
    }

    fn reconcile(&self, state: &mut InteractionState, response: RatingSummary) {
        state.user_rating = Some(response.user_rating);
        state.average_rating = response.average_rating;
        state.ratings_count = response.ratings_count;
    }

    fn restore(&self, state: &mut InteractionState, snapshot: RatingSnapshot) {
        state.user_rating = snapshot.user_rating;
        state.average_rating = snapshot.average_rating;
        state.ratings_count = snapshot.ratings_count;
    }
}
