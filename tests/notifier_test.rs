mod common;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use playmakers_hub::{
    domain::{NotificationKind, RoleCounts},
    error::AppError,
    notifier::{Dispatcher, Notifier},
    repository::{
        NotificationRepository, SqliteBookingRepository, SqliteEventRepository,
        SqliteMemberRepository, SqliteNotificationRepository, SqliteParticipationRepository,
    },
    service::ServiceContext,
};

use common::booking_with_roles;

/// A notifier whose every send blows up. Mutations must not care.
struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    fn name(&self) -> &str {
        "failing"
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, _recipient: &str, _subject: &str, _body: &str) -> playmakers_hub::Result<()> {
        Err(AppError::Internal("smtp relay is down".to_string()))
    }
}

#[tokio::test]
async fn failed_email_delivery_does_not_fail_the_operation() -> anyhow::Result<()> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let booking_repo = Arc::new(SqliteBookingRepository::new(pool.clone()));
    let event_repo = Arc::new(SqliteEventRepository::new(pool.clone()));
    let participation_repo = Arc::new(SqliteParticipationRepository::new(pool.clone()));
    let member_repo = Arc::new(SqliteMemberRepository::new(pool.clone()));
    let notification_repo = Arc::new(SqliteNotificationRepository::new(pool.clone()));

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(FailingNotifier),
        notification_repo.clone(),
    ));

    let ctx = ServiceContext::new(
        booking_repo,
        event_repo,
        participation_repo,
        member_repo,
        notification_repo.clone(),
        dispatcher,
        pool,
    );

    let view = ctx
        .booking_service
        .create_booking(booking_with_roles("Resilient Gig", RoleCounts::default()))
        .await?;

    // The booking landed and the in-app row was written even though the
    // email never left the building.
    assert!(
        notification_repo
            .exists_for_event(view.event.id, NotificationKind::BookingReceived)
            .await?
    );

    Ok(())
}
