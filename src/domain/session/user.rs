//! User summary returned at login time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SkillLevelId, TeamId, UserId};

/// Immutable snapshot of the signed-in user's identity fields.
///
/// Used for display until superseded by a full profile fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub telegram_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub skill_level_id: Option<SkillLevelId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSummary {
    /// Name to show in the shell: full name, then `@username`, then a
    /// generic fallback.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => format!("@{}", name),
            _ => "User".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_json() -> serde_json::Value {
        json!({
            "id": "0d5e1c52-3f1a-4a57-9d8e-7c1b2a3f4e5d",
            "telegram_id": 123456789,
            "username": "ada",
            "first_name": "Ada",
            "last_name": null,
            "team_id": null,
            "skill_level_id": null,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-02T10:00:00+00:00"
        })
    }

    #[test]
    fn user_summary_decodes_backend_shape() {
        let user: UserSummary = serde_json::from_value(user_json()).unwrap();
        assert_eq!(user.telegram_id, 123456789);
        assert_eq!(user.username.as_deref(), Some("ada"));
        assert!(user.team_id.is_none());
    }

    #[test]
    fn display_name_prefers_full_name() {
        let mut user: UserSummary = serde_json::from_value(user_json()).unwrap();
        user.last_name = Some("Lovelace".to_string());
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let mut user: UserSummary = serde_json::from_value(user_json()).unwrap();
        user.first_name = None;
        assert_eq!(user.display_name(), "@ada");
    }

    #[test]
    fn display_name_falls_back_to_generic_label() {
        let mut user: UserSummary = serde_json::from_value(user_json()).unwrap();
        user.first_name = None;
        user.username = None;
        assert_eq!(user.display_name(), "User");
    }
}
