//! Counting channel service.
//!
//! This module provides the `CountingService`, which applies the decisions of the pure
//! counting engine to Discord and to the database. It is organized by concern:
//! - `engine` - Pure per-channel state machine and message parsing
//! - `store` - Lock-guarded in-memory state, shields and message ledger
//! - `moderation` - Callout, mute and hide escalation for tampering
//! - `surface` - Discord actions the service takes, behind a trait

pub mod engine;
pub mod moderation;
pub mod store;
pub mod surface;

#[cfg(test)]
mod test;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::all::{Mentionable, Message, UserId};
use serenity::http::Http;

use crate::{
    data::counting::CountingRepository,
    error::{command::CommandError, AppError},
    model::counting::{CountingChannelState, UpsertCountingChannelParam},
    service::counting::{
        engine::{edit_changes_number, CountOutcome},
        store::{CountingStore, LedgerEntry},
        surface::{CountingSurface, DiscordCountingSurface},
    },
};

/// A message posted in a guild channel by a member.
#[derive(Debug, Clone)]
pub struct CountingMessage {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
    pub author_id: u64,
    pub content: String,
}

impl CountingMessage {
    /// Extracts the counting-relevant parts of a gateway message.
    ///
    /// # Returns
    /// - `Some(CountingMessage)` - A guild message from a member
    /// - `None` - A direct message or a message from a bot
    pub fn from_message(message: &Message) -> Option<Self> {
        if message.author.bot {
            return None;
        }

        Some(Self {
            guild_id: message.guild_id?.get(),
            channel_id: message.channel_id.get(),
            message_id: message.id.get(),
            author_id: message.author.id.get(),
            content: message.content.clone(),
        })
    }
}

/// A message edit in a counting channel, as seen by the gateway.
pub struct CountingEdit {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
    /// Author and content from serenity's cache, if it still had the old message.
    pub cached_before: Option<(u64, String)>,
    /// New content, absent when the edit did not touch the content.
    pub after: Option<String>,
}

/// Service applying counting rules to Discord.
///
/// Holds the database connection for write-through persistence, the shared
/// in-memory store and the Discord actions it performs.
pub struct CountingService<'a, S = DiscordCountingSurface> {
    db: &'a DatabaseConnection,
    store: &'a CountingStore,
    surface: S,
}

impl<'a> CountingService<'a> {
    /// Creates a new CountingService instance acting through the Discord HTTP API.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    /// - `store` - Shared counting state
    /// - `http` - Arc-wrapped Discord HTTP client for API requests
    ///
    /// # Returns
    /// - `CountingService` - New service instance
    pub fn new(db: &'a DatabaseConnection, store: &'a CountingStore, http: Arc<Http>) -> Self {
        Self::with_surface(db, store, DiscordCountingSurface::new(http))
    }

    /// Loads every persisted counting guild and channel into a new store.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `Ok(CountingStore)` - Store holding all persisted state
    /// - `Err(AppError)` - Database error or malformed stored row
    pub async fn load_store(db: &DatabaseConnection) -> Result<CountingStore, AppError> {
        let repo = CountingRepository::new(db);
        let guild_ids = repo.get_all_guild_ids().await?;
        let channels = repo.get_all_channels().await?;

        tracing::info!(
            "Loaded {} counting channels across {} guilds",
            channels.len(),
            guild_ids.len()
        );

        Ok(CountingStore::from_records(guild_ids, channels))
    }
}

impl<'a, S: CountingSurface> CountingService<'a, S> {
    pub fn with_surface(db: &'a DatabaseConnection, store: &'a CountingStore, surface: S) -> Self {
        Self { db, store, surface }
    }

    /// Handles a message posted in a guild channel.
    ///
    /// Messages outside counting channels are ignored.
    ///
    /// # Arguments
    /// - `message` - The posted message
    ///
    /// # Returns
    /// - `Ok(())` - Message handled (or not a counting message)
    /// - `Err(AppError)` - Database or Discord API error
    pub async fn handle_message(&self, message: &CountingMessage) -> Result<(), AppError> {
        let CountingMessage {
            guild_id,
            channel_id,
            message_id,
            author_id,
            ..
        } = *message;

        let (outcome, state) = {
            let mut data = self.store.lock().await;
            let Some(state) = data.channel_mut(guild_id, channel_id) else {
                return Ok(());
            };

            let outcome = state.evaluate(author_id, &message.content);
            let state = state.clone();

            data.ledger.record(
                channel_id,
                LedgerEntry {
                    message_id,
                    author_id,
                    content: message.content.clone(),
                },
            );
            if matches!(
                outcome,
                CountOutcome::WrongNumber { .. } | CountOutcome::ConsecutivePost
            ) {
                data.shields.arm(author_id);
            }

            (outcome, state)
        };

        let mention = UserId::new(author_id).mention();
        match outcome {
            CountOutcome::Accepted {
                count,
                completed,
                persist,
            } => {
                if persist {
                    self.save(guild_id, channel_id, &state).await?;
                }

                if completed {
                    self.close_channel(guild_id, channel_id, state.goal).await?;
                } else {
                    self.update_topic(channel_id, &state).await;
                }

                tracing::debug!("Channel {} counted to {}", channel_id, count);
            }
            CountOutcome::WrongNumber { expected } => {
                let text = format!("{} Your message needs to start with {}", mention, expected);
                self.reject(message, text).await?;
            }
            CountOutcome::ConsecutivePost => {
                let text = format!(
                    "{} You can't send two messages in a row to this channel!",
                    mention
                );
                self.reject(message, text).await?;
            }
            CountOutcome::Completed => {}
        }

        Ok(())
    }

    /// Handles an edit of a message in a guild channel.
    ///
    /// An edit that changes the leading number of a counting message gets the message
    /// deleted and its author restricted. Edits of messages the bot knows nothing
    /// about are ignored.
    ///
    /// # Arguments
    /// - `edit` - The edit event
    /// - `bot_user_id` - The bot's own user ID
    ///
    /// # Returns
    /// - `Ok(())` - Edit handled (or ignored)
    /// - `Err(AppError::DiscordErr)` - Deleting the edited message failed
    pub async fn handle_edit(&self, edit: CountingEdit, bot_user_id: u64) -> Result<(), AppError> {
        let Some(after) = edit.after else {
            return Ok(());
        };

        let author_id = {
            let mut data = self.store.lock().await;
            if data.channel(edit.guild_id, edit.channel_id).is_none() {
                return Ok(());
            }

            let known = data
                .ledger
                .get(edit.channel_id, edit.message_id)
                .map(|entry| (entry.author_id, entry.content.clone()))
                .or(edit.cached_before);
            let Some((author_id, before)) = known else {
                tracing::debug!(
                    "Ignoring edit of unknown message {} in counting channel {}",
                    edit.message_id,
                    edit.channel_id
                );
                return Ok(());
            };

            if author_id == bot_user_id {
                return Ok(());
            }

            if !edit_changes_number(&before, &after) {
                data.ledger
                    .update_content(edit.channel_id, edit.message_id, after);
                return Ok(());
            }

            // The entry stays so the bot's own delete event can find the author.
            data.shields.arm(author_id);
            author_id
        };

        tracing::info!(
            "Member {} changed a counted number in channel {}",
            author_id,
            edit.channel_id
        );

        self.surface
            .delete_message(edit.channel_id, edit.message_id)
            .await?;
        self.surface.restrict(edit.channel_id, author_id);

        Ok(())
    }

    /// Handles a message deletion in a guild channel.
    ///
    /// Deleting a counting message escalates against its author unless the deletion
    /// was caused by the bot, in which case the author's shield is consumed instead.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the message was in
    /// - `channel_id` - Channel the message was in
    /// - `message_id` - Deleted message
    /// - `cached_author` - Author from serenity's cache, if known
    /// - `bot_user_id` - The bot's own user ID
    pub async fn handle_delete(
        &self,
        guild_id: u64,
        channel_id: u64,
        message_id: u64,
        cached_author: Option<u64>,
        bot_user_id: u64,
    ) {
        let author_id = {
            let mut data = self.store.lock().await;
            if data.channel(guild_id, channel_id).is_none() {
                return;
            }

            let author_id = data
                .ledger
                .take(channel_id, message_id)
                .map(|entry| entry.author_id)
                .or(cached_author);
            let Some(author_id) = author_id else {
                tracing::debug!(
                    "Ignoring deletion of unknown message {} in counting channel {}",
                    message_id,
                    channel_id
                );
                return;
            };

            if author_id == bot_user_id || data.shields.consume(author_id) {
                return;
            }

            author_id
        };

        tracing::info!(
            "Member {} deleted a counting message in channel {}",
            author_id,
            channel_id
        );

        self.surface.restrict(channel_id, author_id);
    }

    /// Registers a channel for counting, initializing the guild if needed.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the channel belongs to
    /// - `channel_id` - Channel to register
    ///
    /// # Returns
    /// - `Ok(true)` - Channel added and the guild was initialized by this call
    /// - `Ok(false)` - Channel added to an already initialized guild
    /// - `Err(AppError::CommandErr)` - Channel is already a counting channel
    /// - `Err(AppError)` - Database error
    pub async fn add_channel(&self, guild_id: u64, channel_id: u64) -> Result<bool, AppError> {
        let (initialized, state) = {
            let mut data = self.store.lock().await;
            if data.channel(guild_id, channel_id).is_some() {
                return Err(CommandError::AlreadyCountingChannel.into());
            }

            let initialized = data.init_guild(guild_id);
            let state = CountingChannelState::new();
            data.insert_channel(guild_id, channel_id, state.clone());

            (initialized, state)
        };

        if initialized {
            CountingRepository::new(self.db).create_guild(guild_id).await?;
            tracing::info!("Initialized counting for guild {}", guild_id);
        }
        self.save(guild_id, channel_id, &state).await?;
        self.update_topic(channel_id, &state).await;

        Ok(initialized)
    }

    /// Unregisters a counting channel, clears its topic and lifts the goal lock.
    ///
    /// # Returns
    /// - `Ok(())` - Channel removed
    /// - `Err(AppError::CommandErr)` - Guild uninitialized or channel not registered
    /// - `Err(AppError)` - Database error
    pub async fn remove_channel(&self, guild_id: u64, channel_id: u64) -> Result<(), AppError> {
        let removed = {
            let mut data = self.store.lock().await;
            if !data.is_initialized(guild_id) {
                return Err(CommandError::UninitializedGuild.into());
            }
            data.remove_channel(guild_id, channel_id)
                .ok_or(CommandError::NotCountingChannel)?
        };

        CountingRepository::new(self.db)
            .delete_channel(channel_id)
            .await?;

        if let Err(e) = self.surface.set_topic(channel_id, String::new()).await {
            tracing::warn!("Failed to clear topic of channel {}: {:?}", channel_id, e);
        }

        if removed.is_completed() {
            if let Err(e) = self
                .surface
                .set_everyone_send(guild_id, channel_id, true)
                .await
            {
                tracing::warn!("Failed to unlock removed channel {}: {:?}", channel_id, e);
            }
        }

        Ok(())
    }

    /// Overwrites a channel's count, clearing its last author and reopening it when
    /// the new count is below the goal.
    pub async fn set_count(
        &self,
        guild_id: u64,
        channel_id: u64,
        count: u64,
    ) -> Result<(), AppError> {
        let state = self
            .mutate(guild_id, channel_id, |state| state.set_count(count))
            .await?;

        self.save(guild_id, channel_id, &state).await?;
        self.reopen_if_open(guild_id, channel_id, &state).await?;
        self.update_topic(channel_id, &state).await;

        Ok(())
    }

    /// Toggles strict mode for a channel.
    ///
    /// # Returns
    /// - `Ok(bool)` - New strict mode value
    /// - `Err(AppError::CommandErr)` - Guild uninitialized or channel not registered
    pub async fn toggle_strict(&self, guild_id: u64, channel_id: u64) -> Result<bool, AppError> {
        let state = self
            .mutate(guild_id, channel_id, |state| {
                state.toggle_strict();
            })
            .await?;

        self.save(guild_id, channel_id, &state).await?;

        Ok(state.strict)
    }

    /// Sets a channel's goal, 0 removing it, and reopens the channel when the count
    /// is below the new goal.
    pub async fn set_goal(&self, guild_id: u64, channel_id: u64, goal: u64) -> Result<(), AppError> {
        let state = self
            .mutate(guild_id, channel_id, |state| state.goal = goal)
            .await?;

        self.save(guild_id, channel_id, &state).await?;
        self.reopen_if_open(guild_id, channel_id, &state).await?;
        self.update_topic(channel_id, &state).await;

        Ok(())
    }

    /// Applies an admin change to a registered channel under the store lock.
    async fn mutate(
        &self,
        guild_id: u64,
        channel_id: u64,
        change: impl FnOnce(&mut CountingChannelState),
    ) -> Result<CountingChannelState, AppError> {
        let mut data = self.store.lock().await;
        if !data.is_initialized(guild_id) {
            return Err(CommandError::UninitializedGuild.into());
        }

        let state = data
            .channel_mut(guild_id, channel_id)
            .ok_or(CommandError::NotCountingChannel)?;
        change(state);

        Ok(state.clone())
    }

    async fn save(
        &self,
        guild_id: u64,
        channel_id: u64,
        state: &CountingChannelState,
    ) -> Result<(), AppError> {
        CountingRepository::new(self.db)
            .upsert_channel(UpsertCountingChannelParam {
                guild_id,
                channel_id,
                state: state.clone(),
            })
            .await?;

        Ok(())
    }

    /// Rewrites the channel topic; failures are logged since Discord rate limits
    /// topic edits aggressively.
    async fn update_topic(&self, channel_id: u64, state: &CountingChannelState) {
        if let Err(e) = self.surface.set_topic(channel_id, state.topic()).await {
            tracing::warn!("Failed to update topic of channel {}: {:?}", channel_id, e);
        }
    }

    /// Deletes a rejected message and posts a correction that expires on its own.
    async fn reject(&self, message: &CountingMessage, text: String) -> Result<(), AppError> {
        self.surface
            .delete_message(message.channel_id, message.message_id)
            .await?;
        self.surface.post_correction(message.channel_id, text).await
    }

    /// Locks a channel that reached its goal and announces it.
    async fn close_channel(&self, guild_id: u64, channel_id: u64, goal: u64) -> Result<(), AppError> {
        self.surface
            .set_everyone_send(guild_id, channel_id, false)
            .await?;

        self.surface
            .announce(
                channel_id,
                format!(
                    "Congratulations, this channel has reached its goal of {} :tada::tada::tada:",
                    goal
                ),
            )
            .await?;

        tracing::info!("Counting channel {} reached its goal of {}", channel_id, goal);

        Ok(())
    }

    async fn reopen_if_open(
        &self,
        guild_id: u64,
        channel_id: u64,
        state: &CountingChannelState,
    ) -> Result<(), AppError> {
        if state.is_completed() {
            return Ok(());
        }

        self.surface
            .set_everyone_send(guild_id, channel_id, true)
            .await
    }
}
