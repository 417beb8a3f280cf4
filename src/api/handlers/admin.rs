use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{middleware::CurrentAdmin, state::AppState},
    domain::{
        Event, EventStatus, Notification, ParticipationRecord, ParticipationStanding,
        ParticipationStatus, ParticipationTier,
    },
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ReviewQueueParams {
    status: Option<String>,
}

/// The admin review queue: events in the requested status together with
/// the booking that produced each one. Defaults to Pending.
pub async fn review_queue(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Query(params): Query<ReviewQueueParams>,
) -> Result<Json<Vec<crate::domain::BookingView>>> {
    let status = match params.status.as_deref() {
        Some(raw) => EventStatus::parse(raw).ok_or_else(|| {
            crate::error::AppError::Validation(format!("Unknown event status: {}", raw))
        })?,
        None => EventStatus::Pending,
    };

    let events = state.service_context.event_repo.list_by_status(status).await?;
    let mut views = Vec::with_capacity(events.len());
    for event in events {
        if let Some(booking) = state
            .service_context
            .booking_repo
            .find_by_event(event.id)
            .await?
        {
            let view = state
                .service_context
                .booking_service
                .lookup_booking(booking.id)
                .await?;
            views.push(view);
        }
    }

    Ok(Json(views))
}

#[derive(Debug, Deserialize)]
pub struct AcceptRequest {
    pub participation_tier: ParticipationTier,
}

pub async fn accept_event(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<AcceptRequest>,
) -> Result<Json<Event>> {
    let event = state
        .service_context
        .lifecycle_service
        .accept(event_id, request.participation_tier, &admin.actor())
        .await?;

    Ok(Json(event))
}

pub async fn reject_event(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>> {
    let event = state
        .service_context
        .lifecycle_service
        .reject(event_id, &admin.actor())
        .await?;

    Ok(Json(event))
}

pub async fn open_event(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>> {
    let event = state
        .service_context
        .lifecycle_service
        .open(event_id, &admin.actor())
        .await?;

    Ok(Json(event))
}

pub async fn publish_event(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>> {
    let event = state
        .service_context
        .lifecycle_service
        .publish(event_id, &admin.actor())
        .await?;

    Ok(Json(event))
}

pub async fn event_roster(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Vec<ParticipationRecord>>> {
    let records = state
        .service_context
        .participation_service
        .roster_for_event(event_id)
        .await?;

    Ok(Json(records))
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: ParticipationStatus,
}

/// Admin correction of a ledger entry, typically marking a no-show after
/// the event or confirming a pending participant.
pub async fn set_participation_status(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(participation_id): Path<Uuid>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Json<ParticipationRecord>> {
    let record = state
        .service_context
        .participation_service
        .record_status_change(participation_id, request.status, &admin.actor())
        .await?;

    Ok(Json(record))
}

#[derive(Debug, Serialize)]
pub struct MemberStandingResponse {
    pub member_id: Uuid,
    pub standing: ParticipationStanding,
}

pub async fn member_standing(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<MemberStandingResponse>> {
    let standing = state
        .service_context
        .participation_service
        .standing_for(member_id)
        .await?;

    Ok(Json(MemberStandingResponse {
        member_id,
        standing,
    }))
}

#[derive(Debug, Deserialize)]
pub struct NotificationParams {
    #[serde(default = "default_notification_limit")]
    limit: i64,
}

fn default_notification_limit() -> i64 {
    100
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Query(params): Query<NotificationParams>,
) -> Result<Json<Vec<Notification>>> {
    let notifications = state
        .service_context
        .notification_repo
        .list_recent(params.limit)
        .await?;

    Ok(Json(notifications))
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub events_notified: usize,
}

/// Manual trigger for the fullness sweep. Idempotent, so running it while
/// the background timer is active is harmless.
pub async fn sweep_fullness(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
) -> Result<Json<SweepResponse>> {
    let events_notified = state.service_context.matcher_service.sweep_fullness().await?;
    Ok(Json(SweepResponse { events_notified }))
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub pending_events: usize,
    pub open_events: usize,
    pub published_events: usize,
    pub total_members: usize,
}

pub async fn stats(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
) -> Result<Json<StatsResponse>> {
    let ctx = &state.service_context;
    let pending = ctx.event_repo.list_by_status(EventStatus::Pending).await?;
    let open = ctx.event_repo.list_open().await?;
    let published = ctx
        .event_repo
        .list_by_status(EventStatus::Published)
        .await?;
    let members = ctx.member_repo.list(10_000, 0).await?;

    Ok(Json(StatsResponse {
        pending_events: pending.len(),
        open_events: open.len(),
        published_events: published.len(),
        total_members: members.len(),
    }))
}
