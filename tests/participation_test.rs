mod common;

use playmakers_hub::{
    domain::{
        Actor, Member, MusicianRole, ParticipationStanding, ParticipationStatus, RoleCounts,
    },
    error::AppError,
};
use uuid::Uuid;

use common::{admin, member_with, open_event, setup, TestApp};

/// Books a fresh event, joins `member` as a guitarist, and leaves the
/// record in `status`.
async fn record_with_status(
    app: &TestApp,
    member: &Member,
    status: ParticipationStatus,
) -> anyhow::Result<()> {
    let event = open_event(
        app,
        RoleCounts {
            guitarist: 1,
            ..RoleCounts::default()
        },
    )
    .await?;
    let record = app
        .ctx
        .matcher_service
        .attempt_join(event.id, member, MusicianRole::Guitarist)
        .await?;
    if status != ParticipationStatus::Pending {
        app.ctx
            .participation_service
            .record_status_change(record.id, status, &admin())
            .await?;
    }
    Ok(())
}

#[tokio::test]
async fn fresh_member_has_inactive_standing() -> anyhow::Result<()> {
    let app = setup().await?;
    let member = member_with(
        &app,
        "Newbie",
        "newbie@playmakers.local",
        vec![MusicianRole::Guitarist],
    )
    .await?;

    let standing = app.ctx.participation_service.standing_for(member.id).await?;
    assert_eq!(standing, ParticipationStanding::Inactive);

    let missing = app
        .ctx
        .participation_service
        .standing_for(Uuid::new_v4())
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn active_month_wins_over_any_bad_history() -> anyhow::Result<()> {
    let app = setup().await?;
    let member = member_with(
        &app,
        "Busy",
        "busy@playmakers.local",
        vec![MusicianRole::Guitarist],
    )
    .await?;

    // Plenty of reasons to be flagged, but two commitments this month
    // outrank all of them.
    for _ in 0..2 {
        record_with_status(&app, &member, ParticipationStatus::Pending).await?;
    }
    for _ in 0..2 {
        record_with_status(&app, &member, ParticipationStatus::Backout).await?;
    }
    for _ in 0..5 {
        record_with_status(&app, &member, ParticipationStatus::NonParticipation).await?;
    }

    let standing = app.ctx.participation_service.standing_for(member.id).await?;
    assert_eq!(standing, ParticipationStanding::Green);

    Ok(())
}

#[tokio::test]
async fn a_single_backout_flags_orange() -> anyhow::Result<()> {
    let app = setup().await?;
    let member = member_with(
        &app,
        "Flaky",
        "flaky@playmakers.local",
        vec![MusicianRole::Guitarist],
    )
    .await?;

    record_with_status(&app, &member, ParticipationStatus::Backout).await?;

    let standing = app.ctx.participation_service.standing_for(member.id).await?;
    assert_eq!(standing, ParticipationStanding::Orange);

    Ok(())
}

#[tokio::test]
async fn no_show_threshold_is_three() -> anyhow::Result<()> {
    let app = setup().await?;
    let member = member_with(
        &app,
        "Ghost",
        "ghost@playmakers.local",
        vec![MusicianRole::Guitarist],
    )
    .await?;

    for _ in 0..2 {
        record_with_status(&app, &member, ParticipationStatus::NonParticipation).await?;
    }
    assert_eq!(
        app.ctx.participation_service.standing_for(member.id).await?,
        ParticipationStanding::Inactive
    );

    record_with_status(&app, &member, ParticipationStatus::NonParticipation).await?;
    assert_eq!(
        app.ctx.participation_service.standing_for(member.id).await?,
        ParticipationStanding::Orange
    );

    Ok(())
}

#[tokio::test]
async fn one_active_record_this_month_is_not_enough_for_green() -> anyhow::Result<()> {
    let app = setup().await?;
    let member = member_with(
        &app,
        "Casual",
        "casual@playmakers.local",
        vec![MusicianRole::Guitarist],
    )
    .await?;

    record_with_status(&app, &member, ParticipationStatus::Confirmed).await?;

    assert_eq!(
        app.ctx.participation_service.standing_for(member.id).await?,
        ParticipationStanding::Inactive
    );

    record_with_status(&app, &member, ParticipationStatus::Pending).await?;
    assert_eq!(
        app.ctx.participation_service.standing_for(member.id).await?,
        ParticipationStanding::Green
    );

    Ok(())
}

#[tokio::test]
async fn members_may_only_back_out_of_their_own_records() -> anyhow::Result<()> {
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

    let record = app
        .ctx
        .matcher_service
        .attempt_join(event.id, &alice, MusicianRole::Guitarist)
        .await?;

    // Ben cannot touch Alice's record.
    let result = app
        .ctx
        .participation_service
        .record_status_change(
            record.id,
            ParticipationStatus::Backout,
            &Actor::Member { id: ben.id },
        )
        .await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    // Alice cannot confirm herself; that is an admin call.
    let result = app
        .ctx
        .participation_service
        .record_status_change(
            record.id,
            ParticipationStatus::Confirmed,
            &Actor::Member { id: alice.id },
        )
        .await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    let updated = app
        .ctx
        .participation_service
        .record_status_change(record.id, ParticipationStatus::Confirmed, &admin())
        .await?;
    assert_eq!(updated.status, ParticipationStatus::Confirmed);

    let updated = app
        .ctx
        .participation_service
        .record_status_change(
            record.id,
            ParticipationStatus::Backout,
            &Actor::Member { id: alice.id },
        )
        .await?;
    assert_eq!(updated.status, ParticipationStatus::Backout);

    Ok(())
}

#[tokio::test]
async fn reactivating_a_backed_out_record_respects_capacity() -> anyhow::Result<()> {
    let app = setup().await?;
    let event = open_event(
        &app,
        RoleCounts {
            guitarist: 1,
            ..RoleCounts::default()
        },
    )
    .await?;
    let dana = member_with(
        &app,
        "Dana",
        "dana@playmakers.local",
        vec![MusicianRole::Guitarist],
    )
    .await?;
    let elio = member_with(
        &app,
        "Elio",
        "elio@playmakers.local",
        vec![MusicianRole::Guitarist],
    )
    .await?;

    let first = app
        .ctx
        .matcher_service
        .attempt_join(event.id, &dana, MusicianRole::Guitarist)
        .await?;
    app.ctx
        .participation_service
        .record_status_change(
            first.id,
            ParticipationStatus::Backout,
            &Actor::Member { id: dana.id },
        )
        .await?;

    // The freed slot went to someone else.
    let second = app
        .ctx
        .matcher_service
        .attempt_join(event.id, &elio, MusicianRole::Guitarist)
        .await?;

    // Confirming the backed-out record would put two active guitarists on
    // a one-guitarist requirement.
    let result = app
        .ctx
        .participation_service
        .record_status_change(first.id, ParticipationStatus::Confirmed, &admin())
        .await;
    assert!(matches!(result, Err(AppError::RoleFull(_))));
    assert_eq!(
        app.ctx
            .participation_repo
            .active_count(event.id, MusicianRole::Guitarist)
            .await?,
        1
    );

    // Confirming the record that holds the slot is not a re-claim.
    let updated = app
        .ctx
        .participation_service
        .record_status_change(second.id, ParticipationStatus::Confirmed, &admin())
        .await?;
    assert_eq!(updated.status, ParticipationStatus::Confirmed);

    Ok(())
}
