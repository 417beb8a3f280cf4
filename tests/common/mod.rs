#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, NaiveTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use playmakers_hub::{
    domain::{
        Actor, CreateMemberRequest, Event, EventCategory, Member, MusicianRole, NewBooking,
        ParticipationTier, RoleCounts,
    },
    notifier::{testing::RecordingNotifier, Dispatcher},
    repository::{
        SqliteBookingRepository, SqliteEventRepository, SqliteMemberRepository,
        SqliteNotificationRepository, SqliteParticipationRepository,
    },
    service::ServiceContext,
};

pub struct TestApp {
    pub ctx: ServiceContext,
    pub notifier: Arc<RecordingNotifier>,
    pub pool: SqlitePool,
}

pub async fn setup() -> anyhow::Result<TestApp> {
    // One connection: every extra pool connection would open its own
    // in-memory database, and the racing tests need tasks to share.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let booking_repo = Arc::new(SqliteBookingRepository::new(pool.clone()));
    let event_repo = Arc::new(SqliteEventRepository::new(pool.clone()));
    let participation_repo = Arc::new(SqliteParticipationRepository::new(pool.clone()));
    let member_repo = Arc::new(SqliteMemberRepository::new(pool.clone()));
    let notification_repo = Arc::new(SqliteNotificationRepository::new(pool.clone()));

    let notifier = Arc::new(RecordingNotifier::new());
    let dispatcher = Arc::new(Dispatcher::new(
        notifier.clone(),
        notification_repo.clone(),
    ));

    let ctx = ServiceContext::new(
        booking_repo,
        event_repo,
        participation_repo,
        member_repo,
        notification_repo,
        dispatcher,
        pool.clone(),
    );

    Ok(TestApp {
        ctx,
        notifier,
        pool,
    })
}

pub fn admin() -> Actor {
    Actor::Admin { id: Uuid::new_v4() }
}

pub fn booking_with_roles(title: &str, roles: RoleCounts) -> NewBooking {
    let start = Utc::now().date_naive() + Duration::days(21);
    NewBooking {
        organizer_first_name: "Dana".to_string(),
        organizer_last_name: "Whitfield".to_string(),
        organizer_email: "dana@university.local".to_string(),
        event_location: "University Auditorium".to_string(),
        category: EventCategory::Department,
        organization_name: "College of Engineering".to_string(),
        title: title.to_string(),
        start_date: start,
        end_date: start,
        start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
        genre: Some("Rock".to_string()),
        theme: None,
        description: "Evening concert".to_string(),
        roles,
    }
}

pub async fn member_with(
    app: &TestApp,
    name: &str,
    email: &str,
    capabilities: Vec<MusicianRole>,
) -> anyhow::Result<Member> {
    let member = app
        .ctx
        .member_service
        .create_member(CreateMemberRequest {
            name: name.to_string(),
            email: email.to_string(),
            mobile: None,
            capabilities,
            genres: vec![],
        })
        .await?;
    Ok(member)
}

/// Books an event and drives it to Ongoing so members can join.
pub async fn open_event(app: &TestApp, roles: RoleCounts) -> anyhow::Result<Event> {
    let view = app
        .ctx
        .booking_service
        .create_booking(booking_with_roles("Test Gig", roles))
        .await?;
    let actor = admin();
    app.ctx
        .lifecycle_service
        .accept(view.event.id, ParticipationTier::OpenToAnyone, &actor)
        .await?;
    let event = app.ctx.lifecycle_service.open(view.event.id, &actor).await?;
    Ok(event)
}
