use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An in-app notification row. `member_id` is `None` for system-wide rows
/// such as the one-shot event-full marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub event_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    BookingReceived,
    BookingAccepted,
    BookingRejected,
    RoleInvite,
    EventFull,
    MemberStatusChanged,
    MemberJoined,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::BookingReceived => "BookingReceived",
            NotificationKind::BookingAccepted => "BookingAccepted",
            NotificationKind::BookingRejected => "BookingRejected",
            NotificationKind::RoleInvite => "RoleInvite",
            NotificationKind::EventFull => "EventFull",
            NotificationKind::MemberStatusChanged => "MemberStatusChanged",
            NotificationKind::MemberJoined => "MemberJoined",
        }
    }

    pub fn parse(s: &str) -> Option<NotificationKind> {
        match s {
            "BookingReceived" => Some(NotificationKind::BookingReceived),
            "BookingAccepted" => Some(NotificationKind::BookingAccepted),
            "BookingRejected" => Some(NotificationKind::BookingRejected),
            "RoleInvite" => Some(NotificationKind::RoleInvite),
            "EventFull" => Some(NotificationKind::EventFull),
            "MemberStatusChanged" => Some(NotificationKind::MemberStatusChanged),
            "MemberJoined" => Some(NotificationKind::MemberJoined),
            _ => None,
        }
    }
}
