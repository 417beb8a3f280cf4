use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;

use playmakers_hub::{
    domain::{
        Actor, CreateMemberRequest, EventCategory, EventStatus, MusicianRole, NewBooking,
        ParticipationTier, RoleCounts,
    },
    config::EmailConfig,
    notifier::{Dispatcher, SmtpNotifier},
    repository::{
        SqliteBookingRepository, SqliteEventRepository, SqliteMemberRepository,
        SqliteNotificationRepository, SqliteParticipationRepository,
    },
    service::ServiceContext,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("🌱 Starting database seeding...");

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:playmakers.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let booking_repo = Arc::new(SqliteBookingRepository::new(db_pool.clone()));
    let event_repo = Arc::new(SqliteEventRepository::new(db_pool.clone()));
    let participation_repo = Arc::new(SqliteParticipationRepository::new(db_pool.clone()));
    let member_repo = Arc::new(SqliteMemberRepository::new(db_pool.clone()));
    let notification_repo = Arc::new(SqliteNotificationRepository::new(db_pool.clone()));

    // Seeding never sends real email; a disabled notifier still records
    // the in-app rows.
    let notifier = SmtpNotifier::new(EmailConfig {
        enabled: false,
        ..EmailConfig::default()
    })?;
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(notifier),
        notification_repo.clone(),
    ));

    let ctx = ServiceContext::new(
        booking_repo,
        event_repo,
        participation_repo,
        member_repo,
        notification_repo,
        dispatcher,
        db_pool.clone(),
    );

    println!("👥 Creating members...");

    let alice = ctx
        .member_service
        .create_member(CreateMemberRequest {
            name: "Alice Navarro".to_string(),
            email: "alice@playmakers.local".to_string(),
            mobile: Some("555-0101".to_string()),
            capabilities: vec![MusicianRole::Guitarist, MusicianRole::Vocalist],
            genres: vec!["Rock".to_string(), "Jazz".to_string()],
        })
        .await?;
    println!("  ✅ Created member {}", alice.email);

    let ben = ctx
        .member_service
        .create_member(CreateMemberRequest {
            name: "Ben Osei".to_string(),
            email: "ben@playmakers.local".to_string(),
            mobile: None,
            capabilities: vec![MusicianRole::Bassist],
            genres: vec!["Funk".to_string()],
        })
        .await?;
    println!("  ✅ Created member {}", ben.email);

    let carla = ctx
        .member_service
        .create_member(CreateMemberRequest {
            name: "Carla Reyes".to_string(),
            email: "carla@playmakers.local".to_string(),
            mobile: Some("555-0199".to_string()),
            capabilities: vec![MusicianRole::Percussionist, MusicianRole::Keyboardist],
            genres: vec!["Pop".to_string()],
        })
        .await?;
    println!("  ✅ Created member {}", carla.email);

    println!("📅 Creating bookings...");

    let next_month = Utc::now().date_naive() + Duration::days(30);
    let view = ctx
        .booking_service
        .create_booking(sample_booking(
            "Engineering Week Closing Concert",
            "engweek@university.local",
            next_month,
        ))
        .await?;
    println!("  ✅ Created booking \"{}\"", view.event.title);

    let admin = Actor::Admin {
        id: uuid::Uuid::new_v4(),
    };

    let event = ctx
        .lifecycle_service
        .accept(view.event.id, ParticipationTier::OpenToAnyone, &admin)
        .await?;
    let event = ctx.lifecycle_service.open(event.id, &admin).await?;
    println!(
        "  ✅ Event \"{}\" is {} and accepting participants",
        event.title,
        EventStatus::Ongoing.as_str()
    );

    println!("🎸 Joining members to roles...");
    ctx.matcher_service
        .attempt_join(event.id, &alice, MusicianRole::Guitarist)
        .await?;
    ctx.matcher_service
        .attempt_join(event.id, &ben, MusicianRole::Bassist)
        .await?;
    ctx.matcher_service
        .attempt_join(event.id, &carla, MusicianRole::Percussionist)
        .await?;
    println!("  ✅ Three roles claimed");

    // A second booking left Pending for the admin dashboard.
    let pending = ctx
        .booking_service
        .create_booking(sample_booking(
            "Alumni Homecoming Night",
            "alumni@university.local",
            next_month + Duration::days(14),
        ))
        .await?;
    println!("  ✅ Created pending booking \"{}\"", pending.event.title);

    println!("🎉 Seeding complete!");
    Ok(())
}

fn sample_booking(title: &str, email: &str, start: NaiveDate) -> NewBooking {
    NewBooking {
        organizer_first_name: "Dana".to_string(),
        organizer_last_name: "Whitfield".to_string(),
        organizer_email: email.to_string(),
        event_location: "University Auditorium".to_string(),
        category: EventCategory::Department,
        organization_name: "College of Engineering".to_string(),
        title: title.to_string(),
        start_date: start,
        end_date: start,
        start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
        end_time: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or_default(),
        genre: Some("Rock".to_string()),
        theme: None,
        description: "End of week celebration with live performances.".to_string(),
        roles: RoleCounts {
            guitarist: 1,
            bassist: 1,
            percussionist: 1,
            ..RoleCounts::default()
        },
    }
}
