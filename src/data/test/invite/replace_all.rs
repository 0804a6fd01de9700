use super::*;

/// Tests that replacing a snapshot drops entries not in the new set.
///
/// Expected: Ok with exactly the new entries stored
#[tokio::test]
async fn replaces_snapshot() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_invite_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::invite::TrackedInviteFactory::new(db, "5")
        .code("gone")
        .uses(3)
        .build()
        .await?;

    let repo = TrackedInviteRepository::new(db);
    let snapshot = vec![
        TrackedInvite {
            code: "abc".to_string(),
            uses: 4,
            role_id: Some(10),
        },
        TrackedInvite {
            code: "def".to_string(),
            uses: 0,
            role_id: None,
        },
    ];
    repo.replace_all(5, &snapshot).await?;

    let mut stored = repo.get_by_guild(5).await?;
    stored.sort_by(|a, b| a.code.cmp(&b.code));

    assert_eq!(stored, snapshot);

    Ok(())
}

/// Tests replacing a snapshot with an empty one.
///
/// Expected: Ok with no entries left
#[tokio::test]
async fn clears_snapshot() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_invite_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_tracked_invite(db, "5").await?;

    let repo = TrackedInviteRepository::new(db);
    repo.replace_all(5, &[]).await?;

    assert!(repo.get_by_guild(5).await?.is_empty());

    Ok(())
}
