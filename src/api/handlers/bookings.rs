use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{BookingPatch, BookingView, NewBooking},
    error::Result,
};

/// Public intake endpoint for the booking form. No login required;
/// organizers are external to the organization.
pub async fn create(
    State(state): State<AppState>,
    Json(new_booking): Json<NewBooking>,
) -> Result<(StatusCode, Json<BookingView>)> {
    let view = state
        .service_context
        .booking_service
        .create_booking(new_booking)
        .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>> {
    let view = state
        .service_context
        .booking_service
        .lookup_booking(id)
        .await?;

    Ok(Json(view))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<BookingPatch>,
) -> Result<Json<BookingView>> {
    let view = state
        .service_context
        .booking_service
        .edit_booking(id, patch)
        .await?;

    Ok(Json(view))
}
