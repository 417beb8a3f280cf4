mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use playmakers_hub::{
    api,
    config::Settings,
    domain::{MusicianRole, RoleCounts},
};

use common::{admin, member_with, open_event, setup};

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn health_endpoint_reports_healthy() -> anyhow::Result<()> {
    let app = setup().await?;
    let router = api::create_app(Arc::new(app.ctx), Arc::new(Settings::default()));

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["status"], "healthy");

    Ok(())
}

#[tokio::test]
async fn booking_form_round_trip() -> anyhow::Result<()> {
    let app = setup().await?;
    let router = api::create_app(Arc::new(app.ctx), Arc::new(Settings::default()));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/bookings",
            json!({
                "organizer_first_name": "Dana",
                "organizer_last_name": "Whitfield",
                "organizer_email": "dana@university.local",
                "event_location": "University Auditorium",
                "category": "Department",
                "organization_name": "College of Engineering",
                "title": "Engineering Week Concert",
                "start_date": "2026-10-02",
                "end_date": "2026-10-02",
                "start_time": "18:00:00",
                "end_time": "21:00:00",
                "genre": "Rock",
                "description": "Evening concert",
                "roles": { "guitarist": 1 }
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await?;
    assert_eq!(body["event"]["status"], "Pending");
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/bookings/{}", booking_id))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    // Missing genre and theme is refused at the door.
    let response = router
        .oneshot(json_request(
            "POST",
            "/api/bookings",
            json!({
                "organizer_first_name": "Dana",
                "organizer_last_name": "Whitfield",
                "organizer_email": "dana@university.local",
                "event_location": "University Auditorium",
                "category": "Department",
                "organization_name": "College of Engineering",
                "title": "No Style",
                "start_date": "2026-10-02",
                "end_date": "2026-10-02",
                "start_time": "18:00:00",
                "end_time": "21:00:00",
                "roles": {}
            }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    Ok(())
}

#[tokio::test]
async fn joining_requires_a_member_identity() -> anyhow::Result<()> {
    let app = setup().await?;
    let event = open_event(
        &app,
        RoleCounts {
            guitarist: 1,
            ..RoleCounts::default()
        },
    )
    .await?;
    let alice = member_with(
        &app,
        "Alice",
        "alice@playmakers.local",
        vec![MusicianRole::Guitarist],
    )
    .await?;
    let router = api::create_app(Arc::new(app.ctx), Arc::new(Settings::default()));

    // No identity header.
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/events/{}/join", event.id),
            json!({ "role": "guitarist" }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut request = json_request(
        "POST",
        &format!("/api/events/{}/join", event.id),
        json!({ "role": "guitarist" }),
    );
    request
        .headers_mut()
        .insert("x-member-id", alice.id.to_string().parse()?);
    let response = router.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same member, same role: conflict.
    let mut request = json_request(
        "POST",
        &format!("/api/events/{}/join", event.id),
        json!({ "role": "guitarist" }),
    );
    request
        .headers_mut()
        .insert("x-member-id", alice.id.to_string().parse()?);
    let response = router.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn admin_surface_requires_the_admin_header() -> anyhow::Result<()> {
    let app = setup().await?;
    let view = app
        .ctx
        .booking_service
        .create_booking(common::booking_with_roles(
            "Admin Gated Gig",
            RoleCounts {
                guitarist: 1,
                ..RoleCounts::default()
            },
        ))
        .await?;
    let router = api::create_app(Arc::new(app.ctx), Arc::new(Settings::default()));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/admin/events/{}/accept", view.event.id),
            json!({ "participation_tier": "open-to-anyone" }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut request = json_request(
        "POST",
        &format!("/admin/events/{}/accept", view.event.id),
        json!({ "participation_tier": "open-to-anyone" }),
    );
    request
        .headers_mut()
        .insert("x-admin-id", admin().id().to_string().parse()?);
    let response = router.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["status"], "Accepted");
    assert_eq!(body["participation_tier"], "open-to-anyone");

    let mut request = Request::builder()
        .method("POST")
        .uri(format!("/admin/events/{}/open", view.event.id))
        .body(Body::empty())?;
    request
        .headers_mut()
        .insert("x-admin-id", admin().id().to_string().parse()?);
    let response = router.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    // Publishing an unfilled event fails even for an admin.
    let mut request = Request::builder()
        .method("POST")
        .uri(format!("/admin/events/{}/publish", view.event.id))
        .body(Body::empty())?;
    request
        .headers_mut()
        .insert("x-admin-id", admin().id().to_string().parse()?);
    let response = router.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    Ok(())
}
