use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{CreateMemberRequest, Member, UpdateMemberRequest},
    error::{AppError, Result},
    notifier::{Dispatcher, NotificationEvent},
    repository::MemberRepository,
};

pub struct MemberService {
    member_repo: Arc<dyn MemberRepository>,
    dispatcher: Arc<Dispatcher>,
}

impl MemberService {
    pub fn new(member_repo: Arc<dyn MemberRepository>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            member_repo,
            dispatcher,
        }
    }

    pub async fn create_member(&self, request: CreateMemberRequest) -> Result<Member> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self
            .member_repo
            .find_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A member with this email already exists".to_string(),
            ));
        }

        self.member_repo.create(request).await
    }

    pub async fn get_member(&self, id: Uuid) -> Result<Member> {
        self.member_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))
    }

    pub async fn list_members(&self, limit: i64, offset: i64) -> Result<Vec<Member>> {
        self.member_repo.list(limit, offset).await
    }

    pub async fn update_member(&self, id: Uuid, update: UpdateMemberRequest) -> Result<Member> {
        let before = self.get_member(id).await?;
        let updated = self.member_repo.update(id, update).await?;

        if updated.status != before.status {
            self.dispatcher
                .dispatch(NotificationEvent::MemberStatusChanged(updated.clone()))
                .await;
        }

        Ok(updated)
    }

    /// Removes the account row only. Participation history stays so past
    /// event rosters remain accurate.
    pub async fn delete_member(&self, id: Uuid) -> Result<()> {
        self.get_member(id).await?;
        self.member_repo.delete(id).await
    }
}
