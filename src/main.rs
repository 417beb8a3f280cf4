use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playmakers_hub::{
    api,
    config::Settings,
    notifier::{email::SmtpNotifier, Dispatcher, Notifier},
    repository::{
        SqliteBookingRepository, SqliteEventRepository, SqliteMemberRepository,
        SqliteNotificationRepository, SqliteParticipationRepository,
    },
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playmakers_hub=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!(
        "Starting Playmakers Hub server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let booking_repo = Arc::new(SqliteBookingRepository::new(db_pool.clone()));
    let event_repo = Arc::new(SqliteEventRepository::new(db_pool.clone()));
    let participation_repo = Arc::new(SqliteParticipationRepository::new(db_pool.clone()));
    let member_repo = Arc::new(SqliteMemberRepository::new(db_pool.clone()));
    let notification_repo = Arc::new(SqliteNotificationRepository::new(db_pool.clone()));

    let notifier = SmtpNotifier::new(settings.email.clone())?;
    if notifier.is_enabled() {
        tracing::info!("Email delivery enabled via {}", settings.email.smtp_host);
    } else {
        tracing::info!("Email delivery disabled; notifications are in-app only");
    }
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(notifier),
        notification_repo.clone(),
    ));

    let service_context = Arc::new(ServiceContext::new(
        booking_repo,
        event_repo,
        participation_repo,
        member_repo,
        notification_repo,
        dispatcher,
        db_pool.clone(),
    ));

    // Background fullness sweep. The admin endpoint can trigger one too;
    // both paths are idempotent per event.
    let sweep_context = service_context.clone();
    let sweep_interval = settings.sweep.interval_seconds;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(sweep_interval));
        loop {
            ticker.tick().await;
            match sweep_context.matcher_service.sweep_fullness().await {
                Ok(0) => {}
                Ok(n) => tracing::info!("Fullness sweep notified {} event(s)", n),
                Err(e) => tracing::error!("Fullness sweep failed: {}", e),
            }
        }
    });

    let app = api::create_app(service_context, Arc::new(settings.clone()));

    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        settings.server.host, settings.server.port
    ))
    .await?;

    tracing::info!(
        "Server listening on http://{}:{}",
        settings.server.host, settings.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
