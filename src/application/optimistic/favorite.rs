//! Favorite toggle.

use async_trait::async_trait;

use super::OptimisticMutation;
use crate::domain::foundation::ResourceId;
use crate::domain::resource::InteractionState;
use crate::ports::{ApiError, FavoriteStatus, TechVaultApi};

/// Flips the favorite flag; the server's reported flag wins on success.
#[derive(Debug, Clone, Copy)]
pub struct ToggleFavorite {
    pub id: ResourceId,
}

impl ToggleFavorite {
    pub fn new(id: ResourceId) -> Self {
        Self { id }
    }
}

#[async_trait]
impl OptimisticMutation for ToggleFavorite {
    type State = InteractionState;
    type Snapshot = bool;
    type Response = FavoriteStatus;

    fn scope(&self) -> &'static str {
        "favorite"
    }

    fn describe(&self) -> &'static str {
        "update favorite"
    }

    fn capture(&self, state: &InteractionState) -> bool {
        state.is_favorite
    }

    fn predict(&self, state: &mut InteractionState) {
        state.is_favorite = !state.is_favorite;
    }

    async fn send(&self, api: &dyn TechVaultApi) -> Result<FavoriteStatus, ApiError> {
        api.toggle_favorite(self.id).await
    }

    fn reconcile(&self, state: &mut InteractionState, response: FavoriteStatus) {
        state.is_favorite = response.is_favorite;
    }

    fn restore(&self, state: &mut InteractionState, snapshot: bool) {
        state.is_favorite = snapshot;
    }
}
