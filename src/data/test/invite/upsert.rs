use super::*;

/// Tests creating settings for a guild that has none.
///
/// Expected: Ok with defaults persisted
#[tokio::test]
async fn creates_default_settings() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_invite_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = InviteSettingsRepository::new(db);
    assert!(repo.get(5).await?.is_none());

    let stored = repo.upsert(&InviteGuildSettings::new(5)).await?;

    assert_eq!(stored, InviteGuildSettings::new(5));
    assert_eq!(repo.get(5).await?, Some(InviteGuildSettings::new(5)));

    Ok(())
}

/// Tests updating existing settings in place.
///
/// Expected: Ok with changes persisted and a single row for the guild
#[tokio::test]
async fn updates_existing_settings() -> Result<(), AppError> {
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

    let repo = InviteSettingsRepository::new(db);
    let mut settings = repo.get(5).await?.unwrap();
    settings.channel_id = Some(77);
    settings.join_enabled = true;
    settings.join_message = "Welcome {0.mention}!".to_string();
    repo.upsert(&settings).await?;

    let all = repo.get_all().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].channel_id, Some(77));
    assert!(all[0].join_enabled);
    assert_eq!(all[0].join_message, "Welcome {0.mention}!");

    Ok(())
}
