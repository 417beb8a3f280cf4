pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{config::Settings, service::ServiceContext};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        // Public booking intake and event calendar
        .nest("/api/bookings", booking_routes())
        .nest("/api/events", event_routes(app_state.clone()))
        // Member-facing participation routes
        .nest("/api/me", member_self_routes(app_state.clone()))
        // Admin surface
        .nest("/admin", admin_routes(app_state.clone()))
        .with_state(app_state)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::bookings::create))
        .route("/:id", get(handlers::bookings::get))
        .route("/:id", put(handlers::bookings::update))
}

fn event_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Anyone can browse the calendar
        .route("/", get(handlers::events::list))
        .route("/past", get(handlers::events::list_past))
        .route("/:id", get(handlers::events::get))
        // Joining requires a verified member identity
        .nest(
            "/",
            Router::new()
                .route("/:id/join", post(handlers::participation::join))
                .route_layer(axum::middleware::from_fn_with_state(
                    state,
                    middleware::identity::require_member,
                )),
        )
}

fn member_self_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/standing", get(handlers::participation::my_standing))
        .route("/participation", get(handlers::participation::my_history))
        .route(
            "/participation/:id/backout",
            post(handlers::participation::backout),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::identity::require_member,
        ))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::admin::stats))
        .route("/sweep-fullness", post(handlers::admin::sweep_fullness))
        .route("/notifications", get(handlers::admin::list_notifications))
        // Event lifecycle
        .route("/bookings", get(handlers::admin::review_queue))
        .route("/events/:id/accept", post(handlers::admin::accept_event))
        .route("/events/:id/reject", post(handlers::admin::reject_event))
        .route("/events/:id/open", post(handlers::admin::open_event))
        .route("/events/:id/publish", post(handlers::admin::publish_event))
        .route("/events/:id/roster", get(handlers::admin::event_roster))
        // Ledger corrections
        .route(
            "/participation/:id/status",
            put(handlers::admin::set_participation_status),
        )
        // Member management
        .route("/members", get(handlers::members::list))
        .route("/members", post(handlers::members::create))
        .route("/members/:id", get(handlers::members::get))
        .route("/members/:id", put(handlers::members::update))
        .route("/members/:id", delete(handlers::members::delete))
        .route("/members/:id/standing", get(handlers::admin::member_standing))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::identity::require_admin,
        ))
        .with_state(state)
}
