use super::*;

/// Tests that deleting a guild's settings also drops its invite snapshot.
///
/// Expected: Ok(true), no settings and no tracked invites for the guild, other guilds intact
#[tokio::test]
async fn deletes_settings_and_snapshot() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_invite_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::invite::InviteGuildFactory::new(db)
        .guild_id("5")
        .build()
        .await?;
    factory::create_tracked_invite(db, "5").await?;
    factory::create_tracked_invite(db, "6").await?;

    let settings_repo = InviteSettingsRepository::new(db);
    let invite_repo = TrackedInviteRepository::new(db);

    assert!(settings_repo.delete(5).await?);
    assert!(settings_repo.get(5).await?.is_none());
    assert!(invite_repo.get_by_guild(5).await?.is_empty());
    assert_eq!(invite_repo.get_by_guild(6).await?.len(), 1);

    Ok(())
}

/// Tests deleting a guild that never had settings.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_when_never_enabled() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_invite_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    assert!(!InviteSettingsRepository::new(db).delete(5).await?);

    Ok(())
}
