mod common;

use playmakers_hub::{
    domain::{
        Actor, MusicianRole, NotificationKind, ParticipationStatus, RoleCounts,
    },
    error::AppError,
};

use common::{booking_with_roles, member_with, open_event, setup};

#[tokio::test]
async fn join_claims_a_slot_and_decrements_capacity() -> anyhow::Result<()> {
    let app = setup().await?;
    let event = open_event(
        &app,
        RoleCounts {
            guitarist: 2,
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

    assert_eq!(
        app.ctx
            .matcher_service
            .remaining_capacity(event.id, MusicianRole::Guitarist)
            .await?,
        2
    );

    let record = app
        .ctx
        .matcher_service
        .attempt_join(event.id, &alice, MusicianRole::Guitarist)
        .await?;
    assert_eq!(record.status, ParticipationStatus::Pending);
    assert_eq!(record.member_id, alice.id);

    assert_eq!(
        app.ctx
            .matcher_service
            .remaining_capacity(event.id, MusicianRole::Guitarist)
            .await?,
        1
    );

    Ok(())
}

#[tokio::test]
async fn join_requires_the_matching_capability() -> anyhow::Result<()> {
    let app = setup().await?;
    let event = open_event(
        &app,
        RoleCounts {
            guitarist: 1,
            ..RoleCounts::default()
        },
    )
    .await?;
    let drummer = member_with(
        &app,
        "Carla",
        "carla@playmakers.local",
        vec![MusicianRole::Percussionist],
    )
    .await?;

    let result = app
        .ctx
        .matcher_service
        .attempt_join(event.id, &drummer, MusicianRole::Guitarist)
        .await;
    assert!(matches!(result, Err(AppError::RoleNotEligible(_))));

    Ok(())
}

#[tokio::test]
async fn join_refused_while_event_is_not_open() -> anyhow::Result<()> {
    let app = setup().await?;
    let view = app
        .ctx
        .booking_service
        .create_booking(booking_with_roles(
            "Pending Gig",
            RoleCounts {
                guitarist: 1,
                ..RoleCounts::default()
            },
        ))
        .await?;
    let alice = member_with(
        &app,
        "Alice",
        "alice@playmakers.local",
        vec![MusicianRole::Guitarist],
    )
    .await?;

    let result = app
        .ctx
        .matcher_service
        .attempt_join(view.event.id, &alice, MusicianRole::Guitarist)
        .await;
    assert!(matches!(result, Err(AppError::EventNotOpen(_))));

    Ok(())
}

#[tokio::test]
async fn join_refused_when_role_is_full_or_unrequested() -> anyhow::Result<()> {
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
        vec![MusicianRole::Guitarist, MusicianRole::Vocalist],
    )
    .await?;
    let bella = member_with(
        &app,
        "Bella",
        "bella@playmakers.local",
        vec![MusicianRole::Guitarist],
    )
    .await?;

    // The event asked for no vocalists at all.
    let result = app
        .ctx
        .matcher_service
        .attempt_join(event.id, &alice, MusicianRole::Vocalist)
        .await;
    assert!(matches!(result, Err(AppError::RoleFull(_))));

    app.ctx
        .matcher_service
        .attempt_join(event.id, &alice, MusicianRole::Guitarist)
        .await?;
    let result = app
        .ctx
        .matcher_service
        .attempt_join(event.id, &bella, MusicianRole::Guitarist)
        .await;
    assert!(matches!(result, Err(AppError::RoleFull(_))));

    Ok(())
}

#[tokio::test]
async fn joining_the_same_role_twice_is_refused() -> anyhow::Result<()> {
    let app = setup().await?;
    let event = open_event(
        &app,
        RoleCounts {
            guitarist: 2,
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

    app.ctx
        .matcher_service
        .attempt_join(event.id, &alice, MusicianRole::Guitarist)
        .await?;
    let result = app
        .ctx
        .matcher_service
        .attempt_join(event.id, &alice, MusicianRole::Guitarist)
        .await;
    assert!(matches!(result, Err(AppError::DuplicateJoin(_))));

    Ok(())
}

#[tokio::test]
async fn backing_out_frees_the_slot() -> anyhow::Result<()> {
    let app = setup().await?;
    let event = open_event(
        &app,
        RoleCounts {
            bassist: 1,
            ..RoleCounts::default()
        },
    )
    .await?;
    let ben = member_with(
        &app,
        "Ben",
        "ben@playmakers.local",
        vec![MusicianRole::Bassist],
    )
    .await?;
    let cole = member_with(
        &app,
        "Cole",
        "cole@playmakers.local",
        vec![MusicianRole::Bassist],
    )
    .await?;

    let record = app
        .ctx
        .matcher_service
        .attempt_join(event.id, &ben, MusicianRole::Bassist)
        .await?;
    assert!(app.ctx.matcher_service.is_role_full(event.id, MusicianRole::Bassist).await?);

    app.ctx
        .participation_service
        .record_status_change(
            record.id,
            ParticipationStatus::Backout,
            &Actor::Member { id: ben.id },
        )
        .await?;

    assert_eq!(
        app.ctx
            .matcher_service
            .remaining_capacity(event.id, MusicianRole::Bassist)
            .await?,
        1
    );
    app.ctx
        .matcher_service
        .attempt_join(event.id, &cole, MusicianRole::Bassist)
        .await?;

    Ok(())
}

#[tokio::test]
async fn event_full_notification_fires_exactly_once() -> anyhow::Result<()> {
    let app = setup().await?;
    let event = open_event(
        &app,
        RoleCounts {
            guitarist: 1,
            bassist: 1,
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
    let ben = member_with(
        &app,
        "Ben",
        "ben@playmakers.local",
        vec![MusicianRole::Bassist],
    )
    .await?;

    app.ctx
        .matcher_service
        .attempt_join(event.id, &alice, MusicianRole::Guitarist)
        .await?;
    assert!(
        !app.ctx
            .notification_repo
            .exists_for_event(event.id, NotificationKind::EventFull)
            .await?
    );

    app.ctx
        .matcher_service
        .attempt_join(event.id, &ben, MusicianRole::Bassist)
        .await?;
    assert!(app.ctx.matcher_service.is_full(event.id).await?);
    assert!(
        app.ctx
            .notification_repo
            .exists_for_event(event.id, NotificationKind::EventFull)
            .await?
    );

    // Sweeps after the fact find the marker and stay quiet.
    assert_eq!(app.ctx.matcher_service.sweep_fullness().await?, 0);
    assert_eq!(app.ctx.matcher_service.sweep_fullness().await?, 0);

    Ok(())
}

#[tokio::test]
async fn racing_joins_admit_exactly_the_required_count() -> anyhow::Result<()> {
    let app = setup().await?;
    let event = open_event(
        &app,
        RoleCounts {
            guitarist: 1,
            ..RoleCounts::default()
        },
    )
    .await?;

    let mut members = Vec::new();
    for i in 0..8 {
        members.push(
            member_with(
                &app,
                &format!("Guitarist {i}"),
                &format!("guitarist{i}@playmakers.local"),
                vec![MusicianRole::Guitarist],
            )
            .await?,
        );
    }

    let mut handles = Vec::new();
    for member in members {
        let matcher = app.ctx.matcher_service.clone();
        let event_id = event.id;
        handles.push(tokio::spawn(async move {
            matcher
                .attempt_join(event_id, &member, MusicianRole::Guitarist)
                .await
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => admitted += 1,
            Err(AppError::RoleFull(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(
        app.ctx
            .participation_repo
            .active_count(event.id, MusicianRole::Guitarist)
            .await?,
        1
    );

    Ok(())
}

#[tokio::test]
async fn overlapping_fullness_evaluations_notify_once() -> anyhow::Result<()> {
    let app = setup().await?;
    // A zero-requirement event is full from the start and has never been
    // evaluated, so every task below races for the first marker.
    let event = open_event(&app, RoleCounts::default()).await?;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let matcher = app.ctx.matcher_service.clone();
        let event = event.clone();
        handles.push(tokio::spawn(
            async move { matcher.evaluate_fullness(&event).await },
        ));
    }

    let mut fired = 0;
    for handle in handles {
        if handle.await?? {
            fired += 1;
        }
    }
    assert_eq!(fired, 1);

    let markers = app
        .ctx
        .notification_repo
        .list_recent(100)
        .await?
        .into_iter()
        .filter(|n| n.kind == NotificationKind::EventFull && n.event_id == Some(event.id))
        .count();
    assert_eq!(markers, 1);

    assert_eq!(app.ctx.matcher_service.sweep_fullness().await?, 0);

    Ok(())
}

#[tokio::test]
async fn sweep_notifies_full_events_it_missed() -> anyhow::Result<()> {
    let app = setup().await?;
    let event = open_event(&app, RoleCounts::default()).await?;

    // An event that requires nobody is full from the start; only the
    // sweep will ever notice it.
    assert!(app.ctx.matcher_service.is_full(event.id).await?);
    assert_eq!(app.ctx.matcher_service.sweep_fullness().await?, 1);
    assert!(
        app.ctx
            .notification_repo
            .exists_for_event(event.id, NotificationKind::EventFull)
            .await?
    );
    assert_eq!(app.ctx.matcher_service.sweep_fullness().await?, 0);

    Ok(())
}
