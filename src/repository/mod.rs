use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::*;
use crate::error::Result;

pub mod booking_repository;
pub mod event_repository;
pub mod member_repository;
pub mod notification_repository;
pub mod participation_repository;

pub use booking_repository::SqliteBookingRepository;
pub use event_repository::SqliteEventRepository;
pub use member_repository::SqliteMemberRepository;
pub use notification_repository::SqliteNotificationRepository;
pub use participation_repository::{JoinOutcome, SqliteParticipationRepository};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts booking, event (Pending), and role requirement as one
    /// transaction. Partial writes never survive a failure.
    async fn create(&self, booking: NewBooking) -> Result<BookingView>;
    /// Rewrites all three rows in one transaction. Callers gate on the
    /// event still being Pending.
    async fn update(&self, booking_id: Uuid, patch: BookingPatch) -> Result<BookingView>;
    async fn find_view(&self, booking_id: Uuid) -> Result<Option<BookingView>>;
    async fn find_by_event(&self, event_id: Uuid) -> Result<Option<Booking>>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>>;
    async fn list_by_status(&self, status: EventStatus) -> Result<Vec<Event>>;
    /// Events whose end date has passed, regardless of status.
    async fn list_past(&self, today: NaiveDate) -> Result<Vec<Event>>;
    /// Events currently open for participation (Accepted or Ongoing).
    async fn list_open(&self) -> Result<Vec<Event>>;
    /// Compare-and-swap status update. Returns false when the row was not
    /// in `from` anymore, i.e. a concurrent transition won.
    async fn update_status(
        &self,
        id: Uuid,
        from: EventStatus,
        to: EventStatus,
        tier: Option<ParticipationTier>,
    ) -> Result<bool>;
    async fn requirement(&self, event_id: Uuid) -> Result<Option<RoleRequirement>>;
}

#[async_trait]
pub trait ParticipationRepository: Send + Sync {
    /// Conditional insert: creates a Pending record only while the active
    /// count for (event, role) is below `required`. The capacity check and
    /// the insert are one atomic statement; the unique index on
    /// (event, member, role) turns a concurrent duplicate into an error we
    /// can classify instead of a second row.
    async fn try_insert(
        &self,
        event_id: Uuid,
        member_id: Uuid,
        role: MusicianRole,
        required: i64,
    ) -> Result<JoinOutcome>;
    async fn active_count(&self, event_id: Uuid, role: MusicianRole) -> Result<i64>;
    async fn exists(&self, event_id: Uuid, member_id: Uuid, role: MusicianRole) -> Result<bool>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ParticipationRecord>>;
    async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<ParticipationRecord>>;
    async fn list_for_member(&self, member_id: Uuid) -> Result<Vec<ParticipationRecord>>;
    async fn update_status(
        &self,
        id: Uuid,
        status: ParticipationStatus,
    ) -> Result<ParticipationRecord>;
    /// Conditional activation: moves the record to `status` only while
    /// the active count for its (event, role), not counting the record
    /// itself, is below `required`. The count and the update are one
    /// atomic statement, mirroring `try_insert`. None means the gate
    /// refused.
    async fn try_activate(
        &self,
        id: Uuid,
        status: ParticipationStatus,
        required: i64,
    ) -> Result<Option<ParticipationRecord>>;
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, member: CreateMemberRequest) -> Result<Member>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Member>>;
    async fn update(&self, id: Uuid, update: UpdateMemberRequest) -> Result<Member>;
    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn record(
        &self,
        event_id: Option<Uuid>,
        member_id: Option<Uuid>,
        kind: NotificationKind,
        content: &str,
    ) -> Result<Notification>;
    /// Conditional insert for one-shot notifications. Returns false when a
    /// row for (event, kind) already exists; the unique index makes the
    /// insert itself the arbiter, so concurrent callers cannot both win.
    async fn record_once(
        &self,
        event_id: Uuid,
        kind: NotificationKind,
        content: &str,
    ) -> Result<bool>;
    /// Idempotency check for one-shot notifications keyed by event.
    async fn exists_for_event(&self, event_id: Uuid, kind: NotificationKind) -> Result<bool>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<Notification>>;
}
