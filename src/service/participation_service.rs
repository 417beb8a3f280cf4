use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::{
        tally_activity, ActivityCounts, Actor, ParticipationRecord, ParticipationStanding,
        ParticipationStatus,
    },
    error::{AppError, Result},
    repository::{EventRepository, MemberRepository, ParticipationRepository},
};

/// The participation ledger: record status corrections and derive the
/// monthly standing from history. The standing is computed on demand and
/// never stored.
pub struct ParticipationService {
    participation_repo: Arc<dyn ParticipationRepository>,
    event_repo: Arc<dyn EventRepository>,
    member_repo: Arc<dyn MemberRepository>,
}

impl ParticipationService {
    pub fn new(
        participation_repo: Arc<dyn ParticipationRepository>,
        event_repo: Arc<dyn EventRepository>,
        member_repo: Arc<dyn MemberRepository>,
    ) -> Self {
        Self {
            participation_repo,
            event_repo,
            member_repo,
        }
    }

    /// Admins may set any status. A member may only back out of their own
    /// record. Moving to Backout or Non-Participation frees the role slot
    /// immediately because only Pending and Confirmed count as active.
    /// Moving back the other way re-claims a slot that may have been taken
    /// since, so it goes through the capacity gate again.
    pub async fn record_status_change(
        &self,
        participation_id: Uuid,
        status: ParticipationStatus,
        actor: &Actor,
    ) -> Result<ParticipationRecord> {
        let record = self
            .participation_repo
            .find_by_id(participation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Participation record not found".to_string()))?;

        match actor {
            Actor::Admin { .. } => {}
            Actor::Member { id } => {
                if *id != record.member_id {
                    return Err(AppError::Forbidden);
                }
                if status != ParticipationStatus::Backout {
                    return Err(AppError::Forbidden);
                }
            }
        }

        let updated = if status.is_active() && !record.status.is_active() {
            let requirement = self
                .event_repo
                .requirement(record.event_id)
                .await?
                .ok_or_else(|| {
                    AppError::Database(format!(
                        "Missing role requirements for event {}",
                        record.event_id
                    ))
                })?;

            self.participation_repo
                .try_activate(participation_id, status, requirement.required(record.role))
                .await?
                .ok_or_else(|| {
                    AppError::RoleFull(format!(
                        "The {} role is full again, cannot move this record to {}",
                        record.role,
                        status.as_str()
                    ))
                })?
        } else {
            self.participation_repo
                .update_status(participation_id, status)
                .await?
        };

        tracing::info!(
            participation_id = %participation_id,
            member_id = %record.member_id,
            "Participation moved from {} to {}",
            record.status.as_str(),
            status.as_str()
        );

        Ok(updated)
    }

    pub async fn standing_for(&self, member_id: Uuid) -> Result<ParticipationStanding> {
        Ok(self.activity_for(member_id).await?.standing())
    }

    pub async fn activity_for(&self, member_id: Uuid) -> Result<ActivityCounts> {
        self.member_repo
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        let records = self.participation_repo.list_for_member(member_id).await?;
        Ok(tally_activity(&records, Utc::now()))
    }

    pub async fn history_for(&self, member_id: Uuid) -> Result<Vec<ParticipationRecord>> {
        self.participation_repo.list_for_member(member_id).await
    }

    pub async fn roster_for_event(&self, event_id: Uuid) -> Result<Vec<ParticipationRecord>> {
        self.participation_repo.list_for_event(event_id).await
    }
}
