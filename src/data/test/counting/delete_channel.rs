use super::*;

/// Tests deleting a registered counting channel.
///
/// Expected: Ok(true) and the channel is gone
#[tokio::test]
async fn deletes_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let guild = factory::create_counting_guild(db).await?;
    let channel = factory::create_counting_channel(db, &guild.guild_id).await?;
    let channel_id: u64 = channel.channel_id.parse().unwrap();

    let repo = CountingRepository::new(db);
    let deleted = repo.delete_channel(channel_id).await?;

    assert!(deleted);
    assert!(find_channel(db, channel_id).await?.is_none());

    Ok(())
}

/// Tests deleting a channel that was never registered.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_for_unknown_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = CountingRepository::new(db);

    assert!(!repo.delete_channel(999999999).await?);

    Ok(())
}
