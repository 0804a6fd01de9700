//! Invite factories for creating invite settings and tracked invite rows.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test invite guild settings rows.
///
/// Defaults mirror a freshly initialized guild: no channel, plain text messages,
/// join/leave messages disabled and no bot role.
pub struct InviteGuildFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    channel_id: Option<String>,
    embed: bool,
    join_message: String,
    leave_message: String,
    join_enabled: bool,
    leave_enabled: bool,
    bot_role_id: Option<String>,
    bot_role_enabled: bool,
}

impl<'a> InviteGuildFactory<'a> {
    /// Creates a new InviteGuildFactory with a unique guild ID.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: next_id().to_string(),
            channel_id: None,
            embed: false,
            join_message: "{0.mention} has joined!".to_string(),
            leave_message: "{0.mention} has left!".to_string(),
            join_enabled: false,
            leave_enabled: false,
            bot_role_id: None,
            bot_role_enabled: false,
        }
    }

    /// Sets the guild ID.
    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    /// Sets the greeting channel.
    pub fn channel_id(mut self, channel_id: Option<String>) -> Self {
        self.channel_id = channel_id;
        self
    }

    /// Sets whether messages are sent as embeds.
    pub fn embed(mut self, embed: bool) -> Self {
        self.embed = embed;
        self
    }

    /// Sets the join message template.
    pub fn join_message(mut self, join_message: impl Into<String>) -> Self {
        self.join_message = join_message.into();
        self
    }

    /// Enables or disables join messages.
    pub fn join_enabled(mut self, join_enabled: bool) -> Self {
        self.join_enabled = join_enabled;
        self
    }

    /// Enables or disables leave messages.
    pub fn leave_enabled(mut self, leave_enabled: bool) -> Self {
        self.leave_enabled = leave_enabled;
        self
    }

    /// Sets the role granted to bot accounts on join.
    pub fn bot_role_id(mut self, bot_role_id: Option<String>) -> Self {
        self.bot_role_enabled = bot_role_id.is_some();
        self.bot_role_id = bot_role_id;
        self
    }

    /// Builds and inserts the invite guild row.
    ///
    /// # Returns
    /// - `Ok(entity::invite_guild::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::invite_guild::Model, DbErr> {
        entity::invite_guild::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            channel_id: ActiveValue::Set(self.channel_id),
            embed: ActiveValue::Set(self.embed),
            join_message: ActiveValue::Set(self.join_message),
            leave_message: ActiveValue::Set(self.leave_message),
            join_enabled: ActiveValue::Set(self.join_enabled),
            leave_enabled: ActiveValue::Set(self.leave_enabled),
            bot_role_id: ActiveValue::Set(self.bot_role_id),
            bot_role_enabled: ActiveValue::Set(self.bot_role_enabled),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Factory for creating test tracked invite rows.
pub struct TrackedInviteFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    code: String,
    uses: i64,
    role_id: Option<String>,
}

impl<'a> TrackedInviteFactory<'a> {
    /// Creates a new TrackedInviteFactory with a unique code and zero uses.
    pub fn new(db: &'a DatabaseConnection, guild_id: &str) -> Self {
        Self {
            db,
            guild_id: guild_id.to_string(),
            code: format!("inv{}", next_id()),
            uses: 0,
            role_id: None,
        }
    }

    /// Sets the invite code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the recorded use count.
    pub fn uses(mut self, uses: i64) -> Self {
        self.uses = uses;
        self
    }

    /// Binds a role to the invite.
    pub fn role_id(mut self, role_id: Option<String>) -> Self {
        self.role_id = role_id;
        self
    }

    /// Builds and inserts the tracked invite row.
    ///
    /// # Returns
    /// - `Ok(entity::tracked_invite::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::tracked_invite::Model, DbErr> {
        entity::tracked_invite::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            code: ActiveValue::Set(self.code),
            uses: ActiveValue::Set(self.uses),
            role_id: ActiveValue::Set(self.role_id),
        }
        .insert(self.db)
        .await
    }
}

/// Creates invite guild settings with default values.
pub async fn create_invite_guild(
    db: &DatabaseConnection,
) -> Result<entity::invite_guild::Model, DbErr> {
    InviteGuildFactory::new(db).build().await
}

/// Creates a tracked invite with zero uses and no role in the given guild.
pub async fn create_tracked_invite(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<entity::tracked_invite::Model, DbErr> {
    TrackedInviteFactory::new(db, guild_id).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;

    #[tokio::test]
    async fn creates_invite_guild_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_invite_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let guild = create_invite_guild(db).await?;

        assert!(guild.channel_id.is_none());
        assert!(!guild.join_enabled);
        assert!(!guild.leave_enabled);
        assert_eq!(guild.join_message, "{0.mention} has joined!");
        assert!(!guild.bot_role_enabled);

        Ok(())
    }

    #[tokio::test]
    async fn bot_role_enables_toggle() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_invite_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let guild = InviteGuildFactory::new(db)
            .bot_role_id(Some("42".to_string()))
            .build()
            .await?;

        assert!(guild.bot_role_enabled);
        assert_eq!(guild.bot_role_id.as_deref(), Some("42"));

        Ok(())
    }
}
