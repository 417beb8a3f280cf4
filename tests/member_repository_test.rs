use playmakers_hub::{
    domain::{CreateMemberRequest, MemberStatus, MusicianRole, UpdateMemberRequest},
    repository::{MemberRepository, SqliteMemberRepository},
};
use sqlx::SqlitePool;

#[tokio::test]
async fn test_member_crud() -> anyhow::Result<()> {
    let pool = SqlitePool::connect(":memory:").await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let repo = SqliteMemberRepository::new(pool.clone());

    let member = repo
        .create(CreateMemberRequest {
            name: "Test Member".to_string(),
            email: "test@playmakers.local".to_string(),
            mobile: Some("555-0100".to_string()),
            capabilities: vec![MusicianRole::Guitarist, MusicianRole::Vocalist],
            genres: vec!["Rock".to_string()],
        })
        .await?;
    assert_eq!(member.email, "test@playmakers.local");
    assert_eq!(member.status, MemberStatus::Active);
    assert!(member.can_play(MusicianRole::Guitarist));
    assert!(!member.can_play(MusicianRole::Bassist));

    let found = repo.find_by_id(member.id).await?;
    assert!(found.is_some());
    // Capabilities survive the JSON round trip at the persistence edge.
    assert_eq!(
        found.unwrap().capabilities,
        vec![MusicianRole::Guitarist, MusicianRole::Vocalist]
    );

    let found_by_email = repo.find_by_email("test@playmakers.local").await?;
    assert!(found_by_email.is_some());

    let members = repo.list(10, 0).await?;
    assert_eq!(members.len(), 1);

    let updated = repo
        .update(
            member.id,
            UpdateMemberRequest {
                status: Some(MemberStatus::Probationary),
                capabilities: Some(vec![MusicianRole::Bassist]),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.status, MemberStatus::Probationary);
    assert_eq!(updated.capabilities, vec![MusicianRole::Bassist]);
    // Untouched fields keep their values.
    assert_eq!(updated.mobile.as_deref(), Some("555-0100"));

    repo.delete(member.id).await?;
    let deleted = repo.find_by_id(member.id).await?;
    assert!(deleted.is_none());

    Ok(())
}
