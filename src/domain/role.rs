use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The five musician roles an event can require and a member can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicianRole {
    Guitarist,
    Vocalist,
    Bassist,
    Keyboardist,
    Percussionist,
}

impl MusicianRole {
    pub const ALL: [MusicianRole; 5] = [
        MusicianRole::Guitarist,
        MusicianRole::Vocalist,
        MusicianRole::Bassist,
        MusicianRole::Keyboardist,
        MusicianRole::Percussionist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MusicianRole::Guitarist => "guitarist",
            MusicianRole::Vocalist => "vocalist",
            MusicianRole::Bassist => "bassist",
            MusicianRole::Keyboardist => "keyboardist",
            MusicianRole::Percussionist => "percussionist",
        }
    }

    pub fn parse(s: &str) -> Option<MusicianRole> {
        match s {
            "guitarist" => Some(MusicianRole::Guitarist),
            "vocalist" => Some(MusicianRole::Vocalist),
            "bassist" => Some(MusicianRole::Bassist),
            "keyboardist" => Some(MusicianRole::Keyboardist),
            "percussionist" => Some(MusicianRole::Percussionist),
            _ => None,
        }
    }
}

impl std::fmt::Display for MusicianRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Required headcount per role for one event. Exactly one set per event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRequirement {
    pub event_id: Uuid,
    pub guitarist: i64,
    pub vocalist: i64,
    pub bassist: i64,
    pub keyboardist: i64,
    pub percussionist: i64,
}

impl RoleRequirement {
    pub fn required(&self, role: MusicianRole) -> i64 {
        match role {
            MusicianRole::Guitarist => self.guitarist,
            MusicianRole::Vocalist => self.vocalist,
            MusicianRole::Bassist => self.bassist,
            MusicianRole::Keyboardist => self.keyboardist,
            MusicianRole::Percussionist => self.percussionist,
        }
    }

    pub fn total(&self) -> i64 {
        MusicianRole::ALL
            .iter()
            .map(|role| self.required(*role))
            .sum()
    }

    /// Roles that actually need filling for this event.
    pub fn needed_roles(&self) -> impl Iterator<Item = MusicianRole> + '_ {
        MusicianRole::ALL
            .into_iter()
            .filter(|role| self.required(*role) > 0)
    }
}

/// Headcounts as submitted on a booking form, before an event exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleCounts {
    #[serde(default)]
    pub guitarist: i64,
    #[serde(default)]
    pub vocalist: i64,
    #[serde(default)]
    pub bassist: i64,
    #[serde(default)]
    pub keyboardist: i64,
    #[serde(default)]
    pub percussionist: i64,
}

impl RoleCounts {
    pub fn get(&self, role: MusicianRole) -> i64 {
        match role {
            MusicianRole::Guitarist => self.guitarist,
            MusicianRole::Vocalist => self.vocalist,
            MusicianRole::Bassist => self.bassist,
            MusicianRole::Keyboardist => self.keyboardist,
            MusicianRole::Percussionist => self.percussionist,
        }
    }

    pub fn into_requirement(self, event_id: Uuid) -> RoleRequirement {
        RoleRequirement {
            event_id,
            guitarist: self.guitarist,
            vocalist: self.vocalist,
            bassist: self.bassist,
            keyboardist: self.keyboardist,
            percussionist: self.percussionist,
        }
    }
}
