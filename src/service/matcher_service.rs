use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{Event, Member, MusicianRole, ParticipationRecord},
    error::{AppError, Result},
    notifier::{Dispatcher, NotificationEvent},
    repository::{EventRepository, JoinOutcome, ParticipationRepository},
};

/// The capacity engine. Every capacity question in the system goes through
/// here: join validation, per-role remaining counts, the publish gate, and
/// the fullness sweep all share the same arithmetic.
pub struct MatcherService {
    event_repo: Arc<dyn EventRepository>,
    participation_repo: Arc<dyn ParticipationRepository>,
    dispatcher: Arc<Dispatcher>,
}

impl MatcherService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        participation_repo: Arc<dyn ParticipationRepository>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            event_repo,
            participation_repo,
            dispatcher,
        }
    }

    /// Required minus active. Never negative: joins are refused once it
    /// reaches zero.
    pub async fn remaining_capacity(&self, event_id: Uuid, role: MusicianRole) -> Result<i64> {
        let requirement = self
            .event_repo
            .requirement(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
        let active = self.participation_repo.active_count(event_id, role).await?;

        Ok((requirement.required(role) - active).max(0))
    }

    pub async fn is_role_full(&self, event_id: Uuid, role: MusicianRole) -> Result<bool> {
        Ok(self.remaining_capacity(event_id, role).await? == 0)
    }

    /// True iff every role with a nonzero requirement has no remaining
    /// capacity. An event that requires nobody is trivially full.
    pub async fn is_full(&self, event_id: Uuid) -> Result<bool> {
        let requirement = self
            .event_repo
            .requirement(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        for role in requirement.needed_roles() {
            let active = self.participation_repo.active_count(event_id, role).await?;
            if active < requirement.required(role) {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Validate and record a member's claim on a role slot.
    ///
    /// Check order is part of the contract: eligibility, then the
    /// participation window, then capacity, then duplicates. The capacity
    /// check and the insert are one atomic statement in the repository, so
    /// two concurrent joins racing for the last slot cannot both win.
    pub async fn attempt_join(
        &self,
        event_id: Uuid,
        member: &Member,
        role: MusicianRole,
    ) -> Result<ParticipationRecord> {
        if !member.can_play(role) {
            return Err(AppError::RoleNotEligible(format!(
                "{} cannot fill the {} role",
                member.name, role
            )));
        }

        let event = self
            .event_repo
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        if !event.is_open_for_participation() {
            return Err(AppError::EventNotOpen(format!(
                "\"{}\" is not open for participation while {}",
                event.title, event.status
            )));
        }

        let requirement = self
            .event_repo
            .requirement(event_id)
            .await?
            .ok_or_else(|| {
                AppError::Database(format!("Missing role requirements for event {}", event_id))
            })?;
        let required = requirement.required(role);

        match self
            .participation_repo
            .try_insert(event_id, member.id, role, required)
            .await?
        {
            JoinOutcome::Inserted(record) => {
                self.dispatcher
                    .dispatch(NotificationEvent::MemberJoined {
                        event: event.clone(),
                        member: member.clone(),
                    })
                    .await;

                if let Err(e) = self.evaluate_fullness(&event).await {
                    tracing::warn!(
                        "Fullness evaluation failed for event {}: {}",
                        event.id,
                        e
                    );
                }

                Ok(record)
            }
            JoinOutcome::RoleFull => Err(AppError::RoleFull(format!(
                "The {} role for \"{}\" is already full",
                role, event.title
            ))),
            JoinOutcome::Duplicate => Err(AppError::DuplicateJoin(format!(
                "Already joined \"{}\" as {}",
                event.title, role
            ))),
        }
    }

    /// Fire the one-shot event-full notification if the event is full.
    /// The marker row in the notification log is unique per event, so any
    /// number of overlapping evaluations send exactly once.
    pub async fn evaluate_fullness(&self, event: &Event) -> Result<bool> {
        if !self.is_full(event.id).await? {
            return Ok(false);
        }

        self.dispatcher
            .dispatch_once(NotificationEvent::EventFull(event.clone()))
            .await
    }

    /// Idempotent batch pass over all open events. Safe to run from a
    /// timer and from the admin endpoint at the same time.
    pub async fn sweep_fullness(&self) -> Result<usize> {
        let events = self.event_repo.list_open().await?;
        let mut fired = 0;

        for event in events {
            match self.evaluate_fullness(&event).await {
                Ok(true) => fired += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("Fullness sweep failed for event {}: {}", event.id, e);
                }
            }
        }

        Ok(fired)
    }
}
