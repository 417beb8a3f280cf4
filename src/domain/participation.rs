use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::MusicianRole;

/// One member's claim on one role slot in one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipationRecord {
    pub id: Uuid,
    pub event_id: Uuid,
    pub member_id: Uuid,
    pub role: MusicianRole,
    pub status: ParticipationStatus,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipationStatus {
    Pending,
    Confirmed,
    Backout,
    NonParticipation,
}

impl ParticipationStatus {
    /// Active records consume a role slot. A backout or no-show frees it.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ParticipationStatus::Pending | ParticipationStatus::Confirmed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipationStatus::Pending => "Pending",
            ParticipationStatus::Confirmed => "Confirmed",
            ParticipationStatus::Backout => "Backout",
            ParticipationStatus::NonParticipation => "Non-Participation",
        }
    }

    pub fn parse(s: &str) -> Option<ParticipationStatus> {
        match s {
            "Pending" => Some(ParticipationStatus::Pending),
            "Confirmed" => Some(ParticipationStatus::Confirmed),
            "Backout" => Some(ParticipationStatus::Backout),
            "Non-Participation" => Some(ParticipationStatus::NonParticipation),
            _ => None,
        }
    }
}

/// Monthly activity standing, derived from the ledger, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipationStanding {
    Green,
    Orange,
    Red,
    Inactive,
}

impl ParticipationStanding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipationStanding::Green => "Green",
            ParticipationStanding::Orange => "Orange",
            ParticipationStanding::Red => "Red",
            ParticipationStanding::Inactive => "Inactive",
        }
    }
}

/// Ledger tallies the standing classifier runs on.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityCounts {
    pub participations_this_month: i64,
    pub backouts: i64,
    pub non_participations: i64,
}

impl ActivityCounts {
    /// Classify a member's standing. The Orange and Red conditions overlap
    /// under these thresholds, so evaluation order is part of the contract:
    /// Green, then Orange, then Red, first match wins.
    pub fn standing(&self) -> ParticipationStanding {
        if self.participations_this_month >= 2 {
            return ParticipationStanding::Green;
        }
        if self.non_participations >= 3 || self.backouts >= 1 {
            return ParticipationStanding::Orange;
        }
        if self.non_participations >= 5 || self.backouts >= 2 {
            return ParticipationStanding::Red;
        }
        ParticipationStanding::Inactive
    }
}

/// Tally ledger records for one member relative to `now`.
pub fn tally_activity(records: &[ParticipationRecord], now: DateTime<Utc>) -> ActivityCounts {
    let mut counts = ActivityCounts::default();
    for record in records {
        match record.status {
            ParticipationStatus::Backout => counts.backouts += 1,
            ParticipationStatus::NonParticipation => counts.non_participations += 1,
            ParticipationStatus::Pending | ParticipationStatus::Confirmed => {
                if record.joined_at.year() == now.year() && record.joined_at.month() == now.month()
                {
                    counts.participations_this_month += 1;
                }
            }
        }
    }
    counts
}
