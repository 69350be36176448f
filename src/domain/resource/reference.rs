//! Reference data and profile schemas served by the backend.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::foundation::{MentorId, SkillLevelId, TechnologyId};
use crate::domain::session::UserSummary;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Technology {
    pub id: TechnologyId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkillLevel {
    pub id: SkillLevelId,
    pub name: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Mentor {
    pub id: MentorId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Mentor entry as embedded in the profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileMentor {
    pub id: MentorId,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ProfileStats {
    pub resources_count: u32,
    pub ratings_count: u32,
    pub team_count: u32,
}

/// Full profile; supersedes the login-time `UserSummary` for display.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: UserSummary,
    pub stats: ProfileStats,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub mentors: Vec<ProfileMentor>,
    /// True when mentors come from the user's favorites, false for the
    /// generic recommendation fallback.
    #[serde(default)]
    pub mentors_personalized: bool,
}

/// Looks up a name by id, with the placeholder the detail view shows.
pub fn name_or_placeholder<'a, T, I, F>(items: &'a [T], id: Option<I>, key: F) -> String
where
    I: PartialEq,
    F: Fn(&'a T) -> (I, &'a str),
{
    id.and_then(|id| {
        items
            .iter()
            .map(&key)
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, name)| name.to_string())
    })
    .unwrap_or_else(|| "—".to_string())
}
