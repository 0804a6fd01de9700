use std::sync::Mutex;

use sea_orm::DatabaseConnection;
use serenity::async_trait;
use test_utils::builder::TestBuilder;

use super::*;
use crate::model::counting::CountingChannel;

const GUILD: u64 = 1;
const CHANNEL: u64 = 2;
const MEMBER: u64 = 7;
const BOT: u64 = 999;

/// Records every Discord action the service takes.
#[derive(Default)]
struct FakeSurface {
    deleted: Mutex<Vec<(u64, u64)>>,
    corrections: Mutex<Vec<String>>,
    announcements: Mutex<Vec<String>>,
    topics: Mutex<Vec<(u64, String)>>,
    send_changes: Mutex<Vec<(u64, bool)>>,
    restricted: Mutex<Vec<(u64, u64)>>,
}

#[async_trait]
impl CountingSurface for FakeSurface {
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), AppError> {
        self.deleted.lock().unwrap().push((channel_id, message_id));
        Ok(())
    }

    async fn post_correction(&self, _channel_id: u64, text: String) -> Result<(), AppError> {
        self.corrections.lock().unwrap().push(text);
        Ok(())
    }

    async fn announce(&self, _channel_id: u64, text: String) -> Result<(), AppError> {
        self.announcements.lock().unwrap().push(text);
        Ok(())
    }

    async fn set_topic(&self, channel_id: u64, topic: String) -> Result<(), AppError> {
        self.topics.lock().unwrap().push((channel_id, topic));
        Ok(())
    }

    async fn set_everyone_send(
        &self,
        _guild_id: u64,
        channel_id: u64,
        allowed: bool,
    ) -> Result<(), AppError> {
        self.send_changes.lock().unwrap().push((channel_id, allowed));
        Ok(())
    }

    fn restrict(&self, channel_id: u64, user_id: u64) {
        self.restricted.lock().unwrap().push((channel_id, user_id));
    }
}

fn store_with(count: u64, goal: u64) -> CountingStore {
    CountingStore::from_records(
        vec![GUILD],
        vec![CountingChannel {
            guild_id: GUILD,
            channel_id: CHANNEL,
            state: CountingChannelState {
                count,
                goal,
                ..Default::default()
            },
        }],
    )
}

fn message(message_id: u64, author_id: u64, content: &str) -> CountingMessage {
    CountingMessage {
        guild_id: GUILD,
        channel_id: CHANNEL,
        message_id,
        author_id,
        content: content.to_string(),
    }
}

fn edit(message_id: u64, after: &str) -> CountingEdit {
    CountingEdit {
        guild_id: GUILD,
        channel_id: CHANNEL,
        message_id,
        cached_before: None,
        after: Some(after.to_string()),
    }
}

async fn stored_state(db: &DatabaseConnection) -> Result<Option<CountingChannelState>, AppError> {
    let channels = CountingRepository::new(db).get_all_channels().await?;

    Ok(channels
        .into_iter()
        .find(|channel| channel.channel_id == CHANNEL)
        .map(|channel| channel.state))
}

/// Tests that a rejected count is removed without punishing the author.
///
/// The bot's own delete consumes the shield armed by the rejection, so only a later
/// deletion by the author escalates.
///
/// Expected: correction posted, no restriction until the author deletes a count
#[tokio::test]
async fn rejection_shield_absorbs_bot_delete() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let store = store_with(0, 0);
    let service = CountingService::with_surface(db, &store, FakeSurface::default());

    service.handle_message(&message(100, MEMBER, "5")).await?;

    assert_eq!(*service.surface.deleted.lock().unwrap(), vec![(CHANNEL, 100)]);
    assert_eq!(
        *service.surface.corrections.lock().unwrap(),
        vec!["<@7> Your message needs to start with 1".to_string()]
    );

    service.handle_delete(GUILD, CHANNEL, 100, None, BOT).await;
    assert!(service.surface.restricted.lock().unwrap().is_empty());

    service.handle_message(&message(101, MEMBER, "1")).await?;
    service.handle_delete(GUILD, CHANNEL, 101, None, BOT).await;

    assert_eq!(*service.surface.restricted.lock().unwrap(), vec![(CHANNEL, MEMBER)]);

    Ok(())
}

/// Tests deleting an accepted count without a prior rejection.
///
/// Expected: the author is restricted
#[tokio::test]
async fn unshielded_delete_escalates() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let store = store_with(0, 0);
    let service = CountingService::with_surface(db, &store, FakeSurface::default());

    service.handle_message(&message(100, MEMBER, "1")).await?;
    service.handle_delete(GUILD, CHANNEL, 100, None, BOT).await;

    assert!(service.surface.deleted.lock().unwrap().is_empty());
    assert_eq!(*service.surface.restricted.lock().unwrap(), vec![(CHANNEL, MEMBER)]);

    Ok(())
}

/// Tests deletions the service cannot attribute or that happen outside counting.
///
/// Expected: no restriction for unknown messages or other channels, cache fallback used
#[tokio::test]
async fn delete_needs_a_known_author() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let store = store_with(0, 0);
    let service = CountingService::with_surface(db, &store, FakeSurface::default());

    service.handle_delete(GUILD, CHANNEL, 100, None, BOT).await;
    service.handle_delete(GUILD, 3, 100, Some(MEMBER), BOT).await;
    assert!(service.surface.restricted.lock().unwrap().is_empty());

    service.handle_delete(GUILD, CHANNEL, 100, Some(MEMBER), BOT).await;
    assert_eq!(*service.surface.restricted.lock().unwrap(), vec![(CHANNEL, MEMBER)]);

    Ok(())
}

/// Tests editing the number of an accepted count.
///
/// The bot deletes the message itself; its delete event must find the author in the
/// ledger and consume the shield, so a later deletion by the author still escalates.
///
/// Expected: message deleted, author restricted once per tampering
#[tokio::test]
async fn number_edit_deletes_and_restricts() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let store = store_with(0, 0);
    let service = CountingService::with_surface(db, &store, FakeSurface::default());

    service.handle_message(&message(100, MEMBER, "1")).await?;
    service.handle_message(&message(101, MEMBER, "2")).await?;

    service.handle_edit(edit(100, "7"), BOT).await?;

    assert_eq!(*service.surface.deleted.lock().unwrap(), vec![(CHANNEL, 100)]);
    assert_eq!(*service.surface.restricted.lock().unwrap(), vec![(CHANNEL, MEMBER)]);

    service.handle_delete(GUILD, CHANNEL, 100, None, BOT).await;
    assert_eq!(service.surface.restricted.lock().unwrap().len(), 1);

    service.handle_delete(GUILD, CHANNEL, 101, None, BOT).await;
    assert_eq!(service.surface.restricted.lock().unwrap().len(), 2);

    Ok(())
}

/// Tests editing only the text after the number.
///
/// Expected: nothing deleted or restricted, later edits compare against the new text
#[tokio::test]
async fn trailing_text_edit_is_allowed() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let store = store_with(0, 0);
    let service = CountingService::with_surface(db, &store, FakeSurface::default());

    service.handle_message(&message(100, MEMBER, "1 hi")).await?;
    service.handle_edit(edit(100, "1 hello there"), BOT).await?;
    service.handle_edit(edit(100, "1"), BOT).await?;
    service.handle_edit(edit(555, "9"), BOT).await?;

    assert!(service.surface.deleted.lock().unwrap().is_empty());
    assert!(service.surface.restricted.lock().unwrap().is_empty());

    Ok(())
}

/// Tests reaching a goal that is not a multiple of the persistence interval.
///
/// Expected: channel locked, announcement posted and the final count stored
#[tokio::test]
async fn reaching_goal_locks_and_persists() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let store = store_with(14, 15);
    let service = CountingService::with_surface(db, &store, FakeSurface::default());

    service.handle_message(&message(100, MEMBER, "15")).await?;

    assert_eq!(*service.surface.send_changes.lock().unwrap(), vec![(CHANNEL, false)]);
    assert_eq!(
        *service.surface.announcements.lock().unwrap(),
        vec!["Congratulations, this channel has reached its goal of 15 :tada::tada::tada:".to_string()]
    );
    assert_eq!(stored_state(db).await?.map(|state| state.count), Some(15));

    Ok(())
}

/// Tests raising the goal of a completed channel.
///
/// Expected: goal written through, channel reopened and topic refreshed
#[tokio::test]
async fn raising_goal_reopens_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let store = store_with(15, 15);
    let service = CountingService::with_surface(db, &store, FakeSurface::default());

    service.set_goal(GUILD, CHANNEL, 20).await?;

    let stored = stored_state(db).await?.unwrap();
    assert_eq!((stored.count, stored.goal), (15, 20));
    assert_eq!(*service.surface.send_changes.lock().unwrap(), vec![(CHANNEL, true)]);
    assert_eq!(
        service.surface.topics.lock().unwrap().last(),
        Some(&(
            CHANNEL,
            "Next message must start with 16 | Reach 20 to complete.".to_string()
        ))
    );

    Ok(())
}

/// Tests lowering the goal below the current count.
///
/// Expected: goal stored, channel left locked
#[tokio::test]
async fn lowering_goal_keeps_channel_closed() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let store = store_with(15, 15);
    let service = CountingService::with_surface(db, &store, FakeSurface::default());

    service.set_goal(GUILD, CHANNEL, 10).await?;

    assert_eq!(stored_state(db).await?.map(|state| state.goal), Some(10));
    assert!(service.surface.send_changes.lock().unwrap().is_empty());

    Ok(())
}

/// Tests resetting the count of a completed channel.
///
/// Expected: count written through, last author cleared and channel reopened
#[tokio::test]
async fn set_count_reopens_completed_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let store = store_with(9, 10);
    let service = CountingService::with_surface(db, &store, FakeSurface::default());

    service.handle_message(&message(100, MEMBER, "10")).await?;
    service.set_count(GUILD, CHANNEL, 3).await?;

    let stored = stored_state(db).await?.unwrap();
    assert_eq!(stored.count, 3);
    assert_eq!(stored.last_author_id, None);
    assert_eq!(
        *service.surface.send_changes.lock().unwrap(),
        vec![(CHANNEL, false), (CHANNEL, true)]
    );

    Ok(())
}

/// Tests removing a channel that reached its goal.
///
/// Expected: channel unregistered, topic cleared and the lock lifted
#[tokio::test]
async fn removing_completed_channel_unlocks_it() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let store = store_with(10, 10);
    let service = CountingService::with_surface(db, &store, FakeSurface::default());

    service.remove_channel(GUILD, CHANNEL).await?;

    assert!(store.lock().await.channel(GUILD, CHANNEL).is_none());
    assert_eq!(
        *service.surface.topics.lock().unwrap(),
        vec![(CHANNEL, String::new())]
    );
    assert_eq!(*service.surface.send_changes.lock().unwrap(), vec![(CHANNEL, true)]);

    Ok(())
}

/// Tests admin changes on a guild that never initialized counting.
///
/// Expected: Err(UninitializedGuild) and no Discord actions
#[tokio::test]
async fn admin_changes_need_initialized_guild() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_counting_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let store = CountingStore::default();
    let service = CountingService::with_surface(db, &store, FakeSurface::default());

    let result = service.set_goal(GUILD, CHANNEL, 5).await;

    assert!(matches!(
        result,
        Err(AppError::CommandErr(CommandError::UninitializedGuild))
    ));
    assert!(service.surface.topics.lock().unwrap().is_empty());

    Ok(())
}
