//! Strongly-typed identifier value objects.
//!
//! The backend hands out UUIDs for every entity. Each kind gets its own
//! newtype so a resource id can never be passed where a user id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a shared knowledge resource.
    ResourceId
);
uuid_id!(
    /// Unique identifier for a user (employee) account.
    UserId
);
uuid_id!(
    /// Unique identifier for a team.
    TeamId
);
uuid_id!(
    /// Unique identifier for a skill level.
    SkillLevelId
);
uuid_id!(
    /// Unique identifier for a technology tag.
    TechnologyId
);
uuid_id!(
    /// Unique identifier for a mentor.
    MentorId
);
