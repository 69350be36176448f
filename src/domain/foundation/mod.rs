//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the TechVault client.

mod errors;
mod ids;
mod star_rating;

pub use errors::ValidationError;
pub use ids::{MentorId, ResourceId, SkillLevelId, TeamId, TechnologyId, UserId};
pub use star_rating::StarRating;
