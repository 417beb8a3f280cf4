use std::sync::Arc;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    domain::{tally_activity, Actor, Event, EventStatus, ParticipationTier},
    error::{AppError, Result},
    notifier::{Dispatcher, NotificationEvent},
    repository::{BookingRepository, EventRepository, MemberRepository, ParticipationRepository},
    service::MatcherService,
};

/// Drives events through Pending -> Accepted -> Ongoing -> Published (or
/// Pending -> Rejected). All status writes go through a compare-and-swap
/// in the repository, so two admins racing on the same event resolve to
/// exactly one winner.
pub struct LifecycleService {
    event_repo: Arc<dyn EventRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    member_repo: Arc<dyn MemberRepository>,
    participation_repo: Arc<dyn ParticipationRepository>,
    matcher: Arc<MatcherService>,
    dispatcher: Arc<Dispatcher>,
}

impl LifecycleService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        member_repo: Arc<dyn MemberRepository>,
        participation_repo: Arc<dyn ParticipationRepository>,
        matcher: Arc<MatcherService>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            event_repo,
            booking_repo,
            member_repo,
            participation_repo,
            matcher,
            dispatcher,
        }
    }

    pub async fn accept(
        &self,
        event_id: Uuid,
        tier: ParticipationTier,
        actor: &Actor,
    ) -> Result<Event> {
        self.transition(event_id, EventStatus::Accepted, actor, Some(tier))
            .await
    }

    pub async fn reject(&self, event_id: Uuid, actor: &Actor) -> Result<Event> {
        self.transition(event_id, EventStatus::Rejected, actor, None)
            .await
    }

    pub async fn open(&self, event_id: Uuid, actor: &Actor) -> Result<Event> {
        self.transition(event_id, EventStatus::Ongoing, actor, None)
            .await
    }

    pub async fn publish(&self, event_id: Uuid, actor: &Actor) -> Result<Event> {
        self.transition(event_id, EventStatus::Published, actor, None)
            .await
    }

    /// Generic transition entry point. Validates the edge against the
    /// state machine, enforces the publish capacity gate, then swaps the
    /// status conditionally on the value we read. A lost swap means some
    /// other admin moved the event first.
    pub async fn transition(
        &self,
        event_id: Uuid,
        target: EventStatus,
        actor: &Actor,
        tier: Option<ParticipationTier>,
    ) -> Result<Event> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden);
        }

        let event = self
            .event_repo
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        if !event.status.can_transition_to(target) {
            return Err(AppError::IllegalTransition(format!(
                "Cannot move \"{}\" from {} to {}",
                event.title, event.status, target
            )));
        }

        if target == EventStatus::Published && !self.matcher.is_full(event_id).await? {
            return Err(AppError::CapacityNotMet(format!(
                "\"{}\" still has unfilled roles",
                event.title
            )));
        }

        // The tier is fixed at acceptance time and never changes after.
        let stored_tier = if target == EventStatus::Accepted {
            Some(tier.unwrap_or(ParticipationTier::OpenToAnyone))
        } else {
            None
        };

        let swapped = self
            .event_repo
            .update_status(event_id, event.status, target, stored_tier)
            .await?;
        if !swapped {
            return Err(AppError::IllegalTransition(format!(
                "\"{}\" was updated concurrently and is no longer {}",
                event.title, event.status
            )));
        }

        tracing::info!(
            admin_id = %actor.id(),
            event_id = %event_id,
            "Event transitioned from {} to {}",
            event.status,
            target
        );

        let updated = self
            .event_repo
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        match target {
            EventStatus::Accepted => self.notify_organizer(&updated, true).await,
            EventStatus::Rejected => self.notify_organizer(&updated, false).await,
            EventStatus::Ongoing => self.invite_members(&updated).await?,
            _ => {}
        }

        Ok(updated)
    }

    async fn notify_organizer(&self, event: &Event, accepted: bool) {
        let booking = match self.booking_repo.find_by_event(event.id).await {
            Ok(Some(booking)) => booking,
            Ok(None) => {
                tracing::warn!("No booking attached to event {}", event.id);
                return;
            }
            Err(e) => {
                tracing::error!("Failed to load booking for event {}: {}", event.id, e);
                return;
            }
        };

        let notification = if accepted {
            NotificationEvent::BookingAccepted {
                event: event.clone(),
                booking,
            }
        } else {
            NotificationEvent::BookingRejected {
                event: event.clone(),
                booking,
            }
        };
        self.dispatcher.dispatch(notification).await;
    }

    /// Fan out role invitations to every member whose current monthly
    /// standing falls within the event's participation tier. Best effort
    /// per member: one bad ledger read does not stop the rest.
    async fn invite_members(&self, event: &Event) -> Result<()> {
        let tier = event
            .participation_tier
            .unwrap_or(ParticipationTier::OpenToAnyone);
        let invited = tier.invited_standings();
        let members = self.member_repo.list(10_000, 0).await?;
        let now = Utc::now();
        let mut sent = 0;

        for member in members {
            let records = match self.participation_repo.list_for_member(member.id).await {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("Skipping invite for member {}: {}", member.id, e);
                    continue;
                }
            };
            let standing = tally_activity(&records, now).standing();
            if !invited.contains(&standing) {
                continue;
            }

            self.dispatcher
                .dispatch(NotificationEvent::RoleInvite {
                    event: event.clone(),
                    member,
                })
                .await;
            sent += 1;
        }

        tracing::info!(
            event_id = %event.id,
            "Sent {} role invitations for tier {}",
            sent,
            tier.as_str()
        );

        Ok(())
    }
}
