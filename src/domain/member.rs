use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::MusicianRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: Option<String>,
    /// Roles this member is allowed to fill. Serialized as a JSON array
    /// only at the persistence edge.
    pub capabilities: Vec<MusicianRole>,
    pub genres: Vec<String>,
    pub status: MemberStatus,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn can_play(&self, role: MusicianRole) -> bool {
        self.capabilities.contains(&role)
    }
}

/// Who is asking. Every operation that cares about identity takes one of
/// these explicitly; nothing reads it from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Admin { id: Uuid },
    Member { id: Uuid },
}

impl Actor {
    pub fn id(&self) -> Uuid {
        match self {
            Actor::Admin { id } | Actor::Member { id } => *id,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::Admin { .. })
    }
}

/// Admin-managed account status. Distinct from the derived monthly
/// participation standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberStatus {
    Active,
    Inactive,
    Probationary,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "Active",
            MemberStatus::Inactive => "Inactive",
            MemberStatus::Probationary => "Probationary",
        }
    }

    pub fn parse(s: &str) -> Option<MemberStatus> {
        match s {
            "Active" => Some(MemberStatus::Active),
            "Inactive" => Some(MemberStatus::Inactive),
            "Probationary" => Some(MemberStatus::Probationary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMemberRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    pub mobile: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<MusicianRole>,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub capabilities: Option<Vec<MusicianRole>>,
    pub genres: Option<Vec<String>>,
    pub status: Option<MemberStatus>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
}
