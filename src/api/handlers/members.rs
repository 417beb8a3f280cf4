use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{middleware::CurrentAdmin, state::AppState},
    domain::{CreateMemberRequest, Member, UpdateMemberRequest},
    error::Result,
};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    members: Vec<Member>,
    total: usize,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>> {
    let members = state
        .service_context
        .member_service
        .list_members(params.limit, params.offset)
        .await?;

    let total = members.len();
    Ok(Json(ListResponse { members, total }))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Json(request): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<Member>)> {
    let member = state
        .service_context
        .member_service
        .create_member(request)
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
) -> Result<Json<Member>> {
    let member = state.service_context.member_service.get_member(id).await?;
    Ok(Json(member))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMemberRequest>,
) -> Result<Json<Member>> {
    let member = state
        .service_context
        .member_service
        .update_member(id, request)
        .await?;

    Ok(Json(member))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(_admin): Extension<CurrentAdmin>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state
        .service_context
        .member_service
        .delete_member(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
