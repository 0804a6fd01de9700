use super::*;

/// Tests initializing a guild for counting.
///
/// Expected: Ok(true) and one counting_guild row
#[tokio::test]
async fn initializes_new_guild() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = CountingRepository::new(db);
    let created = repo.create_guild(123456789).await?;

    assert!(created);
    assert_eq!(repo.get_all_guild_ids().await?, vec![123456789]);

    Ok(())
}

/// Tests that initializing an already initialized guild is a no-op.
///
/// Expected: Ok(false) and still exactly one row
#[tokio::test]
async fn is_idempotent() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = CountingRepository::new(db);
    repo.create_guild(123456789).await?;
    let created_again = repo.create_guild(123456789).await?;

    assert!(!created_again);
    let rows = entity::prelude::CountingGuild::find().count(db).await?;
    assert_eq!(rows, 1);

    Ok(())
}
