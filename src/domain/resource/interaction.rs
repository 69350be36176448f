//! The user-visible, mutable facet of a resource.

use super::{AverageRating, Resource};
use crate::domain::foundation::StarRating;

/// Favorite flag, own rating and server aggregates for one resource.
///
/// Owned by the view that holds the resource; favorite and rating
/// mutations act on it optimistically.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    pub is_favorite: bool,
    pub user_rating: Option<StarRating>,
    pub average_rating: AverageRating,
    pub ratings_count: u32,
}

impl InteractionState {
    pub fn from_resource(resource: &Resource) -> Self {
        Self {
            is_favorite: resource.is_favorite,
            user_rating: resource.user_rating,
            average_rating: resource.average_rating,
            ratings_count: resource.ratings_count,
        }
    }

    /// Value the star widget shows: own rating if any, otherwise the
    /// rounded-down average.
    pub fn displayed_stars(&self) -> u8 {
        match self.user_rating {
            Some(rating) => rating.value(),
            None => self.average_rating.value().floor() as u8,
        }
    }
}
