//! Counting factories for creating counting guild and channel rows.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test counting guild rows.
///
/// # Example
///
/// ```rust,ignore
/// let guild = CountingGuildFactory::new(&db).guild_id("987654321").build().await?;
/// ```
pub struct CountingGuildFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
}

impl<'a> CountingGuildFactory<'a> {
    /// Creates a new CountingGuildFactory with a unique guild ID.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    ///
    /// # Returns
    /// - `CountingGuildFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: next_id().to_string(),
        }
    }

    /// Sets the guild ID.
    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    /// Builds and inserts the counting guild row.
    ///
    /// # Returns
    /// - `Ok(entity::counting_guild::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::counting_guild::Model, DbErr> {
        entity::counting_guild::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Factory for creating test counting channel rows.
///
/// Defaults to a fresh channel: count 0, no goal, strict mode off, no last author.
pub struct CountingChannelFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    channel_id: String,
    count: i64,
    goal: i64,
    strict: bool,
    last_author_id: Option<String>,
}

impl<'a> CountingChannelFactory<'a> {
    /// Creates a new CountingChannelFactory for the given guild.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `guild_id` - Guild the channel belongs to
    ///
    /// # Returns
    /// - `CountingChannelFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection, guild_id: &str) -> Self {
        Self {
            db,
            guild_id: guild_id.to_string(),
            channel_id: next_id().to_string(),
            count: 0,
            goal: 0,
            strict: false,
            last_author_id: None,
        }
    }

    /// Sets the channel ID.
    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    /// Sets the current count.
    pub fn count(mut self, count: i64) -> Self {
        self.count = count;
        self
    }

    /// Sets the goal (0 disables it).
    pub fn goal(mut self, goal: i64) -> Self {
        self.goal = goal;
        self
    }

    /// Sets strict mode.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the author of the last accepted message.
    pub fn last_author_id(mut self, last_author_id: Option<String>) -> Self {
        self.last_author_id = last_author_id;
        self
    }

    /// Builds and inserts the counting channel row.
    ///
    /// # Returns
    /// - `Ok(entity::counting_channel::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::counting_channel::Model, DbErr> {
        entity::counting_channel::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            channel_id: ActiveValue::Set(self.channel_id),
            count: ActiveValue::Set(self.count),
            goal: ActiveValue::Set(self.goal),
            strict: ActiveValue::Set(self.strict),
            last_author_id: ActiveValue::Set(self.last_author_id),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a counting guild row with default values.
pub async fn create_counting_guild(
    db: &DatabaseConnection,
) -> Result<entity::counting_guild::Model, DbErr> {
    CountingGuildFactory::new(db).build().await
}

/// Creates a fresh counting channel row in the given guild.
pub async fn create_counting_channel(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<entity::counting_channel::Model, DbErr> {
    CountingChannelFactory::new(db, guild_id).build().await
}
