use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Event, RoleCounts, RoleRequirement};

/// An organizer-submitted booking request. Owns exactly one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub organizer_first_name: String,
    pub organizer_last_name: String,
    pub organizer_email: String,
    pub event_location: String,
    pub category: EventCategory,
    pub organization_name: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn organizer_name(&self) -> String {
        format!("{} {}", self.organizer_first_name, self.organizer_last_name)
    }
}

/// Whether the booking comes from a university department or a student
/// organization. Free-text name lives alongside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCategory {
    Department,
    Organization,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Department => "Department",
            EventCategory::Organization => "Organization",
        }
    }

    pub fn parse(s: &str) -> Option<EventCategory> {
        match s {
            "Department" => Some(EventCategory::Department),
            "Organization" => Some(EventCategory::Organization),
            _ => None,
        }
    }
}

/// Everything the booking form submits: organizer details, event details,
/// and the musician headcounts, created as one unit.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBooking {
    #[validate(length(min = 1, message = "first name is required"))]
    pub organizer_first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub organizer_last_name: String,
    #[validate(email(message = "a valid organizer email is required"))]
    pub organizer_email: String,
    #[validate(length(min = 1, message = "event location is required"))]
    pub event_location: String,
    pub category: EventCategory,
    #[validate(length(min = 1, message = "department/organization name is required"))]
    pub organization_name: String,
    #[validate(length(min = 1, message = "event title is required"))]
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub genre: Option<String>,
    pub theme: Option<String>,
    #[serde(default)]
    pub description: String,
    pub roles: RoleCounts,
}

/// Organizer-side correction of a booking, allowed only while the linked
/// event is still Pending. Same shape as the original form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookingPatch {
    #[validate(length(min = 1, message = "first name is required"))]
    pub organizer_first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub organizer_last_name: String,
    #[validate(email(message = "a valid organizer email is required"))]
    pub organizer_email: String,
    #[validate(length(min = 1, message = "event location is required"))]
    pub event_location: String,
    pub category: EventCategory,
    #[validate(length(min = 1, message = "department/organization name is required"))]
    pub organization_name: String,
    #[validate(length(min = 1, message = "event title is required"))]
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub genre: Option<String>,
    pub theme: Option<String>,
    #[serde(default)]
    pub description: String,
    pub roles: RoleCounts,
}

/// Joined projection of a booking with its event and role requirements,
/// used for display and edit prefill.
#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub booking: Booking,
    pub event: Event,
    pub requirement: RoleRequirement,
}
