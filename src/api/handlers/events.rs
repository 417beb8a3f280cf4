use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{Event, EventStatus, MusicianRole},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    events: Vec<Event>,
    total: usize,
}

/// Per-role slot availability for an event, computed from the ledger on
/// every read.
#[derive(Debug, Serialize)]
pub struct RoleAvailability {
    pub role: MusicianRole,
    pub required: i64,
    pub remaining: i64,
}

#[derive(Debug, Serialize)]
pub struct EventDetail {
    pub event: Event,
    pub availability: Vec<RoleAvailability>,
    pub is_full: bool,
}

/// Without a status filter this lists events currently open for
/// participation, which is what the public calendar shows.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>> {
    let events = match params.status.as_deref() {
        Some(raw) => {
            let status = EventStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown event status: {}", raw)))?;
            state.service_context.event_repo.list_by_status(status).await?
        }
        None => state.service_context.event_repo.list_open().await?,
    };

    let total = events.len();
    Ok(Json(ListResponse { events, total }))
}

pub async fn list_past(State(state): State<AppState>) -> Result<Json<ListResponse>> {
    let events = state
        .service_context
        .event_repo
        .list_past(Utc::now().date_naive())
        .await?;

    let total = events.len();
    Ok(Json(ListResponse { events, total }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventDetail>> {
    let event = state
        .service_context
        .event_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let requirement = state
        .service_context
        .event_repo
        .requirement(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let matcher = &state.service_context.matcher_service;
    let mut availability = Vec::new();
    for role in MusicianRole::ALL {
        let required = requirement.required(role);
        if required == 0 {
            continue;
        }
        availability.push(RoleAvailability {
            role,
            required,
            remaining: matcher.remaining_capacity(id, role).await?,
        });
    }
    let is_full = matcher.is_full(id).await?;

    Ok(Json(EventDetail {
        event,
        availability,
        is_full,
    }))
}
