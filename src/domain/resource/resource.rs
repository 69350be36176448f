//! Shared knowledge resource as served by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AverageRating;
use crate::domain::foundation::{
    MentorId, ResourceId, SkillLevelId, StarRating, TeamId, TechnologyId, UserId,
};

/// Kind of resource in the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Doc,
    Blueprint,
    Snippet,
}

impl ResourceType {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::Doc => "Doc",
            ResourceType::Blueprint => "Blueprint",
            ResourceType::Snippet => "Snippet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TechnologyNested {
    pub id: TechnologyId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkillLevelNested {
    pub id: SkillLevelId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MentorNested {
    pub id: MentorId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default = "default_mentor_role")]
    pub role: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

fn default_mentor_role() -> String {
    "Mentor".to_string()
}

impl MentorNested {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            "Mentor".to_string()
        } else {
            name.to_string()
        }
    }
}

/// A doc, blueprint or snippet with the caller's interaction facet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub uploader_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub file_path: String,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub technology_id: Option<TechnologyId>,
    #[serde(default)]
    pub mentor_id: Option<MentorId>,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub skill_level_id: Option<SkillLevelId>,
    pub average_rating: AverageRating,
    pub ratings_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    #[serde(default)]
    pub technology: Option<TechnologyNested>,
    #[serde(default)]
    pub skill_level: Option<SkillLevelNested>,
    #[serde(default)]
    pub mentor: Option<MentorNested>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub user_rating: Option<StarRating>,
}

impl Resource {
    /// Resolves `file_path` to an openable URL.
    ///
    /// Absolute (`http…`) and protocol-relative (`//…`) paths are returned
    /// unchanged; server-rooted paths (`/demo/file.md`) are prefixed with the
    /// backend origin.
    pub fn file_url(&self, backend_origin: &str) -> String {
        let path = self.file_path.as_str();
        if path.starts_with("http") || path.starts_with("//") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", backend_origin.trim_end_matches('/'), path)
        } else {
            path.to_string()
        }
    }
}
