use super::*;

/// Tests loading every counting channel across guilds.
///
/// Expected: Ok with one domain model per row, IDs parsed to u64
#[tokio::test]
async fn returns_channels_from_all_guilds() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::counting::CountingChannelFactory::new(db, "1")
        .channel_id("10")
        .count(3)
        .build()
        .await?;
    factory::counting::CountingChannelFactory::new(db, "2")
        .channel_id("20")
        .goal(100)
        .strict(true)
        .build()
        .await?;

    let repo = CountingRepository::new(db);
    let mut channels = repo.get_all_channels().await?;
    channels.sort_by_key(|channel| channel.channel_id);

    assert_eq!(channels.len(), 2);
    assert_eq!(channels[0].guild_id, 1);
    assert_eq!(channels[0].state.count, 3);
    assert_eq!(channels[1].guild_id, 2);
    assert_eq!(channels[1].state.goal, 100);
    assert!(channels[1].state.strict);

    Ok(())
}

/// Tests that a malformed stored ID surfaces as an error instead of being skipped.
///
/// Expected: Err(AppError::InternalErr)
#[tokio::test]
async fn fails_on_malformed_id() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::counting::CountingChannelFactory::new(db, "not-a-guild")
        .build()
        .await?;

    let repo = CountingRepository::new(db);
    let result = repo.get_all_channels().await;

    assert!(matches!(result, Err(AppError::InternalErr(_))));

    Ok(())
}

/// Tests loading a row whose count went negative outside the bot.
///
/// Expected: Err(CountOutOfRange) instead of a silently reset count
#[tokio::test]
async fn rejects_negative_stored_count() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::counting::CountingChannelFactory::new(db, "1")
        .channel_id("10")
        .count(-5)
        .build()
        .await?;

    let result = CountingRepository::new(db).get_all_channels().await;

    assert!(matches!(
        result,
        Err(AppError::InternalErr(InternalError::CountOutOfRange(_)))
    ));

    Ok(())
}
