//! Counting data repository for database operations.
//!
//! This module provides the `CountingRepository` for persisting counting guilds and
//! channels. The counting service keeps the authoritative state in memory; this
//! repository is what that state is loaded from at startup and flushed to afterwards.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

use crate::{
    error::AppError,
    model::counting::{CountingChannel, UpsertCountingChannelParam},
    util::parse::{count_to_stored, parse_u64_from_string},
};

/// Repository providing database operations for counting settings.
pub struct CountingRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CountingRepository<'a> {
    /// Creates a new CountingRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `CountingRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the IDs of every guild that has initialized counting.
    ///
    /// # Returns
    /// - `Ok(Vec<u64>)` - Initialized guild IDs
    /// - `Err(AppError)` - Database error or malformed stored ID
    pub async fn get_all_guild_ids(&self) -> Result<Vec<u64>, AppError> {
        let guilds = entity::prelude::CountingGuild::find().all(self.db).await?;

        guilds
            .into_iter()
            .map(|guild| parse_u64_from_string(guild.guild_id))
            .collect()
    }

    /// Gets every counting channel across all guilds.
    ///
    /// Used once at startup to load the in-memory counting store.
    ///
    /// # Returns
    /// - `Ok(Vec<CountingChannel>)` - All counting channels
    /// - `Err(AppError)` - Database error or malformed stored ID
    pub async fn get_all_channels(&self) -> Result<Vec<CountingChannel>, AppError> {
        let channels = entity::prelude::CountingChannel::find().all(self.db).await?;

        channels
            .into_iter()
            .map(CountingChannel::from_entity)
            .collect()
    }

    /// Marks a guild as initialized for counting.
    ///
    /// Idempotent: an already initialized guild is left untouched.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    ///
    /// # Returns
    /// - `Ok(true)` - The guild was newly initialized
    /// - `Ok(false)` - The guild was already initialized
    /// - `Err(DbErr)` - Database error during lookup or insert
    pub async fn create_guild(&self, guild_id: u64) -> Result<bool, DbErr> {
        let existing = entity::prelude::CountingGuild::find()
            .filter(entity::counting_guild::Column::GuildId.eq(guild_id.to_string()))
            .one(self.db)
            .await?;

        if existing.is_some() {
            return Ok(false);
        }

        entity::counting_guild::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(guild_id.to_string()),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(true)
    }

    /// Creates or overwrites the stored state of a counting channel.
    ///
    /// The whole channel state is written, matching how the in-memory store flushes.
    ///
    /// # Arguments
    /// - `param` - Guild, channel and full channel state
    ///
    /// # Returns
    /// - `Ok(CountingChannel)` - The stored channel
    /// - `Err(AppError::InternalErr)` - Count or goal does not fit the stored column
    /// - `Err(AppError)` - Database error during upsert
    pub async fn upsert_channel(
        &self,
        param: UpsertCountingChannelParam,
    ) -> Result<CountingChannel, AppError> {
        let state = param.state;
        let count = ActiveValue::Set(count_to_stored(state.count)?);
        let goal = ActiveValue::Set(count_to_stored(state.goal)?);

        let existing = entity::prelude::CountingChannel::find()
            .filter(entity::counting_channel::Column::ChannelId.eq(param.channel_id.to_string()))
            .one(self.db)
            .await?;

        let strict = ActiveValue::Set(state.strict);
        let last_author_id = ActiveValue::Set(state.last_author_id.map(|id| id.to_string()));

        let entity = if let Some(existing) = existing {
            entity::counting_channel::ActiveModel {
                id: ActiveValue::Set(existing.id),
                guild_id: ActiveValue::Set(existing.guild_id),
                channel_id: ActiveValue::Set(existing.channel_id),
                count,
                goal,
                strict,
                last_author_id,
            }
            .update(self.db)
            .await?
        } else {
            entity::counting_channel::ActiveModel {
                id: ActiveValue::NotSet,
                guild_id: ActiveValue::Set(param.guild_id.to_string()),
                channel_id: ActiveValue::Set(param.channel_id.to_string()),
                count,
                goal,
                strict,
                last_author_id,
            }
            .insert(self.db)
            .await?
        };

        CountingChannel::from_entity(entity)
    }

    /// Deletes a counting channel.
    ///
    /// # Arguments
    /// - `channel_id` - Discord channel ID
    ///
    /// # Returns
    /// - `Ok(true)` - A row was deleted
    /// - `Ok(false)` - The channel was not registered
    /// - `Err(DbErr)` - Database error during delete
    pub async fn delete_channel(&self, channel_id: u64) -> Result<bool, DbErr> {
        let result = entity::prelude::CountingChannel::delete_many()
            .filter(entity::counting_channel::Column::ChannelId.eq(channel_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
