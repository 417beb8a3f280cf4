//! Caller identity extraction. Authentication itself happens upstream at
//! the reverse proxy, which strips any client-supplied identity headers
//! and sets `X-Member-Id` / `X-Admin-Id` for verified callers. This layer
//! turns those headers into typed extensions; handlers never touch raw
//! headers.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{Actor, Member},
    error::AppError,
};

const MEMBER_HEADER: &str = "x-member-id";
const ADMIN_HEADER: &str = "x-admin-id";

#[derive(Clone)]
pub struct CurrentMember {
    pub member: Member,
}

impl CurrentMember {
    pub fn actor(&self) -> Actor {
        Actor::Member { id: self.member.id }
    }
}

#[derive(Clone)]
pub struct CurrentAdmin {
    pub admin_id: Uuid,
}

impl CurrentAdmin {
    pub fn actor(&self) -> Actor {
        Actor::Admin { id: self.admin_id }
    }
}

fn header_uuid(headers: &HeaderMap, name: &str) -> Result<Uuid, AppError> {
    let value = headers
        .get(name)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;
    Uuid::parse_str(value).map_err(|_| AppError::Unauthorized)
}

pub async fn require_member(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let member_id = header_uuid(request.headers(), MEMBER_HEADER)?;

    let member = state
        .service_context
        .member_repo
        .find_by_id(member_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(CurrentMember { member });

    Ok(next.run(request).await)
}

pub async fn require_admin(
    State(_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let admin_id = header_uuid(request.headers(), ADMIN_HEADER)?;

    request.extensions_mut().insert(CurrentAdmin { admin_id });

    Ok(next.run(request).await)
}
