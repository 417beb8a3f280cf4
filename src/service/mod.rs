pub mod booking_service;
pub mod lifecycle_service;
pub mod matcher_service;
pub mod member_service;
pub mod participation_service;

use std::sync::Arc;
use sqlx::SqlitePool;

use crate::notifier::Dispatcher;
use crate::repository::*;

pub use booking_service::BookingService;
pub use lifecycle_service::LifecycleService;
pub use matcher_service::MatcherService;
pub use member_service::MemberService;
pub use participation_service::ParticipationService;

pub struct ServiceContext {
    pub booking_repo: Arc<dyn BookingRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub participation_repo: Arc<dyn ParticipationRepository>,
    pub member_repo: Arc<dyn MemberRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub dispatcher: Arc<Dispatcher>,
    pub booking_service: Arc<BookingService>,
    pub lifecycle_service: Arc<LifecycleService>,
    pub matcher_service: Arc<MatcherService>,
    pub participation_service: Arc<ParticipationService>,
    pub member_service: Arc<MemberService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        event_repo: Arc<dyn EventRepository>,
        participation_repo: Arc<dyn ParticipationRepository>,
        member_repo: Arc<dyn MemberRepository>,
        notification_repo: Arc<dyn NotificationRepository>,
        dispatcher: Arc<Dispatcher>,
        db_pool: SqlitePool,
    ) -> Self {
        let matcher_service = Arc::new(MatcherService::new(
            event_repo.clone(),
            participation_repo.clone(),
            dispatcher.clone(),
        ));
        let lifecycle_service = Arc::new(LifecycleService::new(
            event_repo.clone(),
            booking_repo.clone(),
            member_repo.clone(),
            participation_repo.clone(),
            matcher_service.clone(),
            dispatcher.clone(),
        ));
        let booking_service = Arc::new(BookingService::new(
            booking_repo.clone(),
            dispatcher.clone(),
        ));
        let participation_service = Arc::new(ParticipationService::new(
            participation_repo.clone(),
            event_repo.clone(),
            member_repo.clone(),
        ));
        let member_service = Arc::new(MemberService::new(
            member_repo.clone(),
            dispatcher.clone(),
        ));

        Self {
            booking_repo,
            event_repo,
            participation_repo,
            member_repo,
            notification_repo,
            dispatcher,
            booking_service,
            lifecycle_service,
            matcher_service,
            participation_service,
            member_service,
            db_pool,
        }
    }
}
