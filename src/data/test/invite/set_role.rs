use super::*;

/// Tests binding and unbinding a role on a tracked invite.
///
/// Expected: Ok(true) both times with the binding reflected in the snapshot
#[tokio::test]
async fn binds_and_unbinds_role() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_invite_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::invite::TrackedInviteFactory::new(db, "5")
        .code("abc")
        .build()
        .await?;

    let repo = TrackedInviteRepository::new(db);

    assert!(repo.set_role(5, "abc", Some(42)).await?);
    assert_eq!(repo.get_by_guild(5).await?[0].role_id, Some(42));

    assert!(repo.set_role(5, "abc", None).await?);
    assert_eq!(repo.get_by_guild(5).await?[0].role_id, None);

    Ok(())
}

/// Tests binding a role to an invite that is not tracked for the guild.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_for_unknown_invite() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_invite_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::invite::TrackedInviteFactory::new(db, "6")
        .code("abc")
        .build()
        .await?;

    let repo = TrackedInviteRepository::new(db);

    assert!(!repo.set_role(5, "abc", Some(42)).await?);

    Ok(())
}
