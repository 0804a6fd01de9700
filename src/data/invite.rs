//! Invite data repositories for database operations.
//!
//! Provides `InviteSettingsRepository` for per-guild greeting settings and
//! `TrackedInviteRepository` for the invite use-count snapshot the tracker diffs
//! against. Snapshots are rewritten whole on every reconciliation.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    TransactionTrait,
};

use crate::{
    error::AppError,
    model::invite::{InviteGuildSettings, TrackedInvite},
};

/// Repository providing database operations for invite greeting settings.
pub struct InviteSettingsRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> InviteSettingsRepository<'a> {
    /// Creates a new InviteSettingsRepository instance.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the settings of a guild.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    ///
    /// # Returns
    /// - `Ok(Some(InviteGuildSettings))` - The guild has settings
    /// - `Ok(None)` - The guild never used the invite utilities
    /// - `Err(AppError)` - Database error or malformed stored ID
    pub async fn get(&self, guild_id: u64) -> Result<Option<InviteGuildSettings>, AppError> {
        let entity = entity::prelude::InviteGuild::find()
            .filter(entity::invite_guild::Column::GuildId.eq(guild_id.to_string()))
            .one(self.db)
            .await?;

        entity.map(InviteGuildSettings::from_entity).transpose()
    }

    /// Gets the settings of every configured guild.
    ///
    /// # Returns
    /// - `Ok(Vec<InviteGuildSettings>)` - Settings for all configured guilds
    /// - `Err(AppError)` - Database error or malformed stored ID
    pub async fn get_all(&self) -> Result<Vec<InviteGuildSettings>, AppError> {
        entity::prelude::InviteGuild::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(InviteGuildSettings::from_entity)
            .collect()
    }

    /// Creates or overwrites the settings of a guild.
    ///
    /// # Arguments
    /// - `settings` - Complete settings to store
    ///
    /// # Returns
    /// - `Ok(InviteGuildSettings)` - The stored settings
    /// - `Err(AppError)` - Database error during upsert
    pub async fn upsert(
        &self,
        settings: &InviteGuildSettings,
    ) -> Result<InviteGuildSettings, AppError> {
        let existing = entity::prelude::InviteGuild::find()
            .filter(entity::invite_guild::Column::GuildId.eq(settings.guild_id.to_string()))
            .one(self.db)
            .await?;

        let (id, created_at) = match existing {
            Some(existing) => (ActiveValue::Set(existing.id), existing.created_at),
            None => (ActiveValue::NotSet, Utc::now()),
        };

        let active = entity::invite_guild::ActiveModel {
            id,
            guild_id: ActiveValue::Set(settings.guild_id.to_string()),
            channel_id: ActiveValue::Set(settings.channel_id.map(|id| id.to_string())),
            embed: ActiveValue::Set(settings.embed),
            join_message: ActiveValue::Set(settings.join_message.clone()),
            leave_message: ActiveValue::Set(settings.leave_message.clone()),
            join_enabled: ActiveValue::Set(settings.join_enabled),
            leave_enabled: ActiveValue::Set(settings.leave_enabled),
            bot_role_id: ActiveValue::Set(settings.bot_role_id.map(|id| id.to_string())),
            bot_role_enabled: ActiveValue::Set(settings.bot_role_enabled),
            created_at: ActiveValue::Set(created_at),
        };

        let entity = if active.id.is_set() {
            active.update(self.db).await?
        } else {
            active.insert(self.db).await?
        };

        InviteGuildSettings::from_entity(entity)
    }

    /// Deletes a guild's settings together with its invite snapshot.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    ///
    /// # Returns
    /// - `Ok(true)` - Settings existed and were deleted
    /// - `Ok(false)` - The guild had no settings
    /// - `Err(DbErr)` - Database error; nothing is deleted
    pub async fn delete(&self, guild_id: u64) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;

        entity::prelude::TrackedInvite::delete_many()
            .filter(entity::tracked_invite::Column::GuildId.eq(guild_id.to_string()))
            .exec(&txn)
            .await?;

        let result = entity::prelude::InviteGuild::delete_many()
            .filter(entity::invite_guild::Column::GuildId.eq(guild_id.to_string()))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }
}

/// Repository providing database operations for the invite use-count snapshot.
pub struct TrackedInviteRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TrackedInviteRepository<'a> {
    /// Creates a new TrackedInviteRepository instance.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the snapshot of a guild's invites.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    ///
    /// # Returns
    /// - `Ok(Vec<TrackedInvite>)` - Snapshot entries, empty if never reconciled
    /// - `Err(AppError)` - Database error or malformed stored ID
    pub async fn get_by_guild(&self, guild_id: u64) -> Result<Vec<TrackedInvite>, AppError> {
        entity::prelude::TrackedInvite::find()
            .filter(entity::tracked_invite::Column::GuildId.eq(guild_id.to_string()))
            .all(self.db)
            .await?
            .into_iter()
            .map(TrackedInvite::from_entity)
            .collect()
    }

    /// Replaces a guild's snapshot with the given entries in one transaction.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `invites` - The complete new snapshot
    ///
    /// # Returns
    /// - `Ok(())` - Snapshot replaced
    /// - `Err(DbErr)` - Database error; the previous snapshot is kept
    pub async fn replace_all(&self, guild_id: u64, invites: &[TrackedInvite]) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        entity::prelude::TrackedInvite::delete_many()
            .filter(entity::tracked_invite::Column::GuildId.eq(guild_id.to_string()))
            .exec(&txn)
            .await?;

        if !invites.is_empty() {
            let models = invites
                .iter()
                .map(|invite| entity::tracked_invite::ActiveModel {
                    id: ActiveValue::NotSet,
                    guild_id: ActiveValue::Set(guild_id.to_string()),
                    code: ActiveValue::Set(invite.code.clone()),
                    uses: ActiveValue::Set(invite.uses as i64),
                    role_id: ActiveValue::Set(invite.role_id.map(|id| id.to_string())),
                });

            entity::prelude::TrackedInvite::insert_many(models)
                .exec(&txn)
                .await?;
        }

        txn.commit().await
    }

    /// Binds a role to a tracked invite, or clears the binding with `None`.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `code` - Invite code
    /// - `role_id` - Role to grant on join, or `None` to unbind
    ///
    /// # Returns
    /// - `Ok(true)` - The invite was found and updated
    /// - `Ok(false)` - The invite is not in the snapshot
    /// - `Err(DbErr)` - Database error during update
    pub async fn set_role(
        &self,
        guild_id: u64,
        code: &str,
        role_id: Option<u64>,
    ) -> Result<bool, DbErr> {
        let Some(existing) = entity::prelude::TrackedInvite::find()
            .filter(entity::tracked_invite::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::tracked_invite::Column::Code.eq(code))
            .one(self.db)
            .await?
        else {
            return Ok(false);
        };

        let mut active: entity::tracked_invite::ActiveModel = existing.into();
        active.role_id = ActiveValue::Set(role_id.map(|id| id.to_string()));
        active.update(self.db).await?;

        Ok(true)
    }
}
