//! Resource module - typed backend schemas and the interaction facet.
//!
//! Every response shape is decoded here at the gateway boundary, so an
//! unexpected payload becomes a decode error instead of a bad value deep in
//! a view.

mod average_rating;
mod interaction;
mod reference;
#[allow(clippy::module_inception)]
mod resource;

pub use average_rating::AverageRating;
pub use interaction::InteractionState;
pub use reference::{
    name_or_placeholder, Mentor, ProfileMentor, ProfileStats, SkillLevel, Technology, UserProfile,
};
pub use resource::{MentorNested, Resource, ResourceType, SkillLevelNested, TechnologyNested};

#[cfg(test)]
pub(crate) use resource::fixtures;
