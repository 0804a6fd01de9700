use super::*;

/// Tests creating a counting channel row.
///
/// Expected: Ok with the stored state echoed back
#[tokio::test]
async fn creates_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = CountingRepository::new(db);
    let channel = repo
        .upsert_channel(UpsertCountingChannelParam {
            guild_id: 1,
            channel_id: 2,
            state: CountingChannelState::default(),
        })
        .await?;

    assert_eq!(channel.guild_id, 1);
    assert_eq!(channel.channel_id, 2);
    assert_eq!(channel.state, CountingChannelState::default());

    Ok(())
}

/// Tests overwriting an existing counting channel's state.
///
/// Verifies the whole state is replaced, including clearing the last author.
///
/// Expected: Ok with updated state and no duplicate row
#[tokio::test]
async fn overwrites_existing_state() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::counting::CountingChannelFactory::new(db, "1")
        .channel_id("2")
        .count(7)
        .last_author_id(Some("99".to_string()))
        .build()
        .await?;

    let repo = CountingRepository::new(db);
    let state = CountingChannelState {
        count: 20,
        last_author_id: None,
        goal: 50,
        strict: true,
    };
    let channel = repo
        .upsert_channel(UpsertCountingChannelParam {
            guild_id: 1,
            channel_id: 2,
            state: state.clone(),
        })
        .await?;

    assert_eq!(channel.state, state);
    let rows = entity::prelude::CountingChannel::find().count(db).await?;
    assert_eq!(rows, 1);

    let reloaded = find_channel(db, 2).await?.unwrap();
    assert_eq!(reloaded.state, state);

    Ok(())
}

/// Tests that the largest storable count and goal survive a reload unchanged.
///
/// Expected: Ok with the reloaded state equal to the written one
#[tokio::test]
async fn round_trips_largest_values() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let state = CountingChannelState {
        count: i64::MAX as u64,
        last_author_id: None,
        goal: i64::MAX as u64,
        strict: false,
    };
    CountingRepository::new(db)
        .upsert_channel(UpsertCountingChannelParam {
            guild_id: 1,
            channel_id: 2,
            state: state.clone(),
        })
        .await?;

    let reloaded = find_channel(db, 2).await?.unwrap();
    assert_eq!(reloaded.state, state);

    Ok(())
}

/// Tests writing a count beyond the signed column range.
///
/// Expected: Err(CountOutOfRange) and no row written
#[tokio::test]
async fn rejects_count_beyond_column_range() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let result = CountingRepository::new(db)
        .upsert_channel(UpsertCountingChannelParam {
            guild_id: 1,
            channel_id: 2,
            state: CountingChannelState {
                count: 1 << 63,
                ..Default::default()
            },
        })
        .await;

    assert!(matches!(
        result,
        Err(AppError::InternalErr(InternalError::CountOutOfRange(_)))
    ));
    assert!(find_channel(db, 2).await?.is_none());

    Ok(())
}
