use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{middleware::CurrentMember, state::AppState},
    domain::{ActivityCounts, MusicianRole, ParticipationRecord, ParticipationStanding},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub role: MusicianRole,
}

/// Claim a role slot in an event. The caller is the member identified by
/// the request; capacity and duplicate checks happen atomically below.
pub async fn join(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentMember>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<JoinRequest>,
) -> Result<(StatusCode, Json<ParticipationRecord>)> {
    let record = state
        .service_context
        .matcher_service
        .attempt_join(event_id, &user.member, request.role)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// A member backing out of their own commitment. The freed slot becomes
/// available to other members immediately.
pub async fn backout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentMember>,
    Path(participation_id): Path<Uuid>,
) -> Result<Json<ParticipationRecord>> {
    let record = state
        .service_context
        .participation_service
        .record_status_change(
            participation_id,
            crate::domain::ParticipationStatus::Backout,
            &user.actor(),
        )
        .await?;

    Ok(Json(record))
}

#[derive(Debug, Serialize)]
pub struct StandingResponse {
    pub member_id: Uuid,
    pub standing: ParticipationStanding,
    pub participations_this_month: i64,
    pub backouts: i64,
    pub non_participations: i64,
}

pub async fn my_standing(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentMember>,
) -> Result<Json<StandingResponse>> {
    let counts: ActivityCounts = state
        .service_context
        .participation_service
        .activity_for(user.member.id)
        .await?;

    Ok(Json(StandingResponse {
        member_id: user.member.id,
        standing: counts.standing(),
        participations_this_month: counts.participations_this_month,
        backouts: counts.backouts,
        non_participations: counts.non_participations,
    }))
}

pub async fn my_history(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentMember>,
) -> Result<Json<Vec<ParticipationRecord>>> {
    let records = state
        .service_context
        .participation_service
        .history_for(user.member.id)
        .await?;

    Ok(Json(records))
}
