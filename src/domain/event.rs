use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ParticipationStanding;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: EventStatus,
    pub genre: Option<String>,
    pub theme: Option<String>,
    pub description: String,
    pub participation_tier: Option<ParticipationTier>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Members may claim role slots only in this window.
    pub fn is_open_for_participation(&self) -> bool {
        matches!(self.status, EventStatus::Accepted | EventStatus::Ongoing)
    }

    /// "Past" is a read-side view, not a lifecycle state.
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.end_date < today
    }
}

/// Lifecycle status. Transitions move forward only:
/// Pending -> Accepted -> Ongoing -> Published, or Pending -> Rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Pending,
    Accepted,
    Rejected,
    Ongoing,
    Published,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "Pending",
            EventStatus::Accepted => "Accepted",
            EventStatus::Rejected => "Rejected",
            EventStatus::Ongoing => "Ongoing",
            EventStatus::Published => "Published",
        }
    }

    pub fn parse(s: &str) -> Option<EventStatus> {
        match s {
            "Pending" => Some(EventStatus::Pending),
            "Accepted" => Some(EventStatus::Accepted),
            "Rejected" => Some(EventStatus::Rejected),
            "Ongoing" => Some(EventStatus::Ongoing),
            "Published" => Some(EventStatus::Published),
            _ => None,
        }
    }

    /// Whether `self -> target` is an edge of the lifecycle graph.
    pub fn can_transition_to(&self, target: EventStatus) -> bool {
        matches!(
            (self, target),
            (EventStatus::Pending, EventStatus::Accepted)
                | (EventStatus::Pending, EventStatus::Rejected)
                | (EventStatus::Accepted, EventStatus::Ongoing)
                | (EventStatus::Ongoing, EventStatus::Published)
        )
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin-chosen invite scope, fixed at acceptance and stored on the event.
/// Each tier widens toward fewer members: open invites everyone, the
/// inactive tier invites Orange and Red standings, probationary only Red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipationTier {
    OpenToAnyone,
    InactiveMembers,
    ProbationaryMembers,
}

impl ParticipationTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipationTier::OpenToAnyone => "open-to-anyone",
            ParticipationTier::InactiveMembers => "inactive-members",
            ParticipationTier::ProbationaryMembers => "probationary-members",
        }
    }

    pub fn parse(s: &str) -> Option<ParticipationTier> {
        match s {
            "open-to-anyone" => Some(ParticipationTier::OpenToAnyone),
            "inactive-members" => Some(ParticipationTier::InactiveMembers),
            "probationary-members" => Some(ParticipationTier::ProbationaryMembers),
            _ => None,
        }
    }

    /// Standings this tier invites when the event opens.
    pub fn invited_standings(&self) -> &'static [ParticipationStanding] {
        match self {
            ParticipationTier::OpenToAnyone => &[
                ParticipationStanding::Green,
                ParticipationStanding::Orange,
                ParticipationStanding::Red,
                ParticipationStanding::Inactive,
            ],
            ParticipationTier::InactiveMembers => &[
                ParticipationStanding::Orange,
                ParticipationStanding::Red,
            ],
            ParticipationTier::ProbationaryMembers => &[ParticipationStanding::Red],
        }
    }
}
