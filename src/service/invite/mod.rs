//! Invite tracking service.
//!
//! This module provides the `InviteService`, which keeps a per-guild snapshot of invite
//! use counts, attributes joins to invites, grants invite-bound roles and posts the
//! configured welcome and farewell messages. It is organized by concern:
//! - `tracker` - Pure reconciliation and attribution
//! - `template` - Join/leave message templates

pub mod template;
pub mod tracker;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::all::{ChannelId, CreateEmbed, CreateMessage, GuildId, Member, RoleId, User};
use serenity::http::Http;

use crate::{
    data::invite::{InviteSettingsRepository, TrackedInviteRepository},
    error::{command::CommandError, AppError},
    model::invite::{Attribution, InviteGuildSettings, LiveInvite, TrackedInvite},
    service::invite::template::{GuildArg, MemberArg, RoleArg, TemplateArgs},
};

const JOIN_TITLE: &str = "Member Joined!";
const JOIN_COLOUR: u32 = 0x00FF00;
const LEAVE_TITLE: &str = "Member Left!";
const LEAVE_COLOUR: u32 = 0xFF0000;

/// Appended to join messages when the invite could not be determined.
const UNDETERMINED_NOTICE: &str =
    "\n*I couldn't tell which invite was used, so invite details are unknown.*";

/// Service providing invite tracking and welcome message operations.
pub struct InviteService<'a> {
    db: &'a DatabaseConnection,
    http: Arc<Http>,
}

impl<'a> InviteService<'a> {
    /// Creates a new InviteService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    /// - `http` - Arc-wrapped Discord HTTP client for API requests
    ///
    /// # Returns
    /// - `InviteService` - New service instance
    pub fn new(db: &'a DatabaseConnection, http: Arc<Http>) -> Self {
        Self { db, http }
    }

    /// Gets a guild's settings, if invite utilities were ever used there.
    pub async fn get_settings(&self, guild_id: u64) -> Result<Option<InviteGuildSettings>, AppError> {
        InviteSettingsRepository::new(self.db).get(guild_id).await
    }

    /// Gets a guild's settings, falling back to defaults for a guild that has none.
    ///
    /// The defaults are not persisted until `save_settings` is called.
    pub async fn get_or_default_settings(
        &self,
        guild_id: u64,
    ) -> Result<InviteGuildSettings, AppError> {
        Ok(self
            .get_settings(guild_id)
            .await?
            .unwrap_or_else(|| InviteGuildSettings::new(guild_id)))
    }

    pub async fn save_settings(&self, settings: &InviteGuildSettings) -> Result<(), AppError> {
        InviteSettingsRepository::new(self.db).upsert(settings).await?;

        Ok(())
    }

    /// Deletes all settings and the invite snapshot of a guild.
    ///
    /// # Returns
    /// - `Ok(true)` - Settings existed and were deleted
    /// - `Ok(false)` - The guild had no settings
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn delete_settings(&self, guild_id: u64) -> Result<bool, AppError> {
        Ok(InviteSettingsRepository::new(self.db)
            .delete(guild_id)
            .await?)
    }

    /// Gets the guild's current invite snapshot.
    pub async fn tracked_invites(&self, guild_id: u64) -> Result<Vec<TrackedInvite>, AppError> {
        TrackedInviteRepository::new(self.db)
            .get_by_guild(guild_id)
            .await
    }

    /// Binds a role to an invite in the snapshot, or unbinds it with `None`.
    ///
    /// # Returns
    /// - `Ok(())` - Binding updated
    /// - `Err(AppError::CommandErr)` - The invite is not in the snapshot
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn bind_role(
        &self,
        guild_id: u64,
        code: &str,
        role_id: Option<u64>,
    ) -> Result<(), AppError> {
        let updated = TrackedInviteRepository::new(self.db)
            .set_role(guild_id, code, role_id)
            .await?;

        if !updated {
            return Err(CommandError::UnknownInvite.into());
        }

        Ok(())
    }

    /// Fetches the invites Discord currently reports for a guild.
    pub async fn fetch_live(&self, guild_id: u64) -> Result<Vec<LiveInvite>, AppError> {
        let invites = GuildId::new(guild_id).invites(&self.http).await?;

        Ok(invites.iter().map(LiveInvite::from_rich_invite).collect())
    }

    /// Reconciles the stored snapshot with the live invites of a guild.
    ///
    /// # Returns
    /// - `Ok(Vec<TrackedInvite>)` - The new snapshot
    /// - `Err(AppError)` - Fetching invites or writing the snapshot failed
    pub async fn sync_guild(&self, guild_id: u64) -> Result<Vec<TrackedInvite>, AppError> {
        let live = self.fetch_live(guild_id).await?;
        let tracked = self.tracked_invites(guild_id).await?;

        self.store_snapshot(guild_id, &tracked, &live).await
    }

    async fn store_snapshot(
        &self,
        guild_id: u64,
        tracked: &[TrackedInvite],
        live: &[LiveInvite],
    ) -> Result<Vec<TrackedInvite>, AppError> {
        let snapshot = tracker::reconcile(tracked, live);

        TrackedInviteRepository::new(self.db)
            .replace_all(guild_id, &snapshot)
            .await?;

        tracing::debug!(
            "Reconciled {} invites for guild {}",
            snapshot.len(),
            guild_id
        );

        Ok(snapshot)
    }

    /// Handles a member joining a guild with invite utilities enabled.
    ///
    /// Grants the bot role to bots, attributes the join to an invite, grants the role
    /// bound to that invite, posts the join message and finally reconciles the snapshot.
    ///
    /// # Arguments
    /// - `member` - The new member
    /// - `guild_name` - Guild name from the cache, fetched when absent
    ///
    /// # Returns
    /// - `Ok(())` - Join handled (or guild not configured)
    /// - `Err(AppError)` - Database or Discord API error
    pub async fn handle_member_join(
        &self,
        member: &Member,
        guild_name: Option<String>,
    ) -> Result<(), AppError> {
        let guild_id = member.guild_id.get();
        let Some(settings) = self.get_settings(guild_id).await? else {
            return Ok(());
        };

        let tracked = self.tracked_invites(guild_id).await?;
        let live = self.fetch_live(guild_id).await?;
        let roles = member.guild_id.roles(&self.http).await?;

        if member.user.bot && settings.bot_role_enabled {
            if let Some(role_id) = settings.bot_role_id.map(RoleId::new) {
                if roles.contains_key(&role_id) {
                    if let Err(e) = member.add_role(&self.http, role_id).await {
                        tracing::error!("Failed to grant bot role to {}: {:?}", member.user.id, e);
                    }
                }
            }
        }

        let attribution = tracker::infer_invite(&tracked, &live);
        let determined = matches!(attribution, Attribution::Determined(_));
        let (invite, role) = match attribution {
            Attribution::Determined(invite) => {
                let binding = tracked
                    .iter()
                    .find(|entry| entry.code == invite.code)
                    .and_then(|entry| entry.role_id);

                let role = match binding.and_then(|id| roles.get(&RoleId::new(id))) {
                    Some(role) => {
                        if let Err(e) = member.add_role(&self.http, role.id).await {
                            tracing::error!(
                                "Failed to grant invite role {} to {}: {:?}",
                                role.id,
                                member.user.id,
                                e
                            );
                        }
                        RoleArg::Granted {
                            id: role.id.get(),
                            name: role.name.clone(),
                        }
                    }
                    None if binding.is_some() => RoleArg::Deleted,
                    None => RoleArg::None,
                };

                tracing::info!(
                    "Member {} joined guild {} through invite {}",
                    member.user.id,
                    guild_id,
                    invite.code
                );

                (invite, role)
            }
            Attribution::Undetermined => {
                tracing::info!(
                    "Could not determine the invite member {} used to join guild {}",
                    member.user.id,
                    guild_id
                );

                (LiveInvite::placeholder(), RoleArg::None)
            }
        };

        if let (true, Some(channel_id)) = (settings.join_enabled, settings.channel_id) {
            let guild = self.guild_arg(member.guild_id, guild_name).await?;
            let member_arg = member_arg(&member.user);
            let args = TemplateArgs {
                member: &member_arg,
                guild: &guild,
                invite: Some(&invite),
                role: Some(&role),
            };

            match template::render(&settings.join_message, &args) {
                Ok(mut text) => {
                    if !determined {
                        text.push_str(UNDETERMINED_NOTICE);
                    }
                    self.announce(
                        ChannelId::new(channel_id),
                        settings.embed,
                        JOIN_TITLE,
                        JOIN_COLOUR,
                        text,
                        member.user.face(),
                    )
                    .await;
                }
                Err(e) => {
                    tracing::warn!("Join message of guild {} is invalid: {}", guild_id, e);
                    self.announce_plain(
                        ChannelId::new(channel_id),
                        "Your `joinmessage` was improperly formatted!".to_string(),
                    )
                    .await;
                }
            }
        }

        self.store_snapshot(guild_id, &tracked, &live).await?;

        Ok(())
    }

    /// Handles a member leaving a guild with invite utilities enabled.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the member left
    /// - `user` - The departed user
    /// - `guild_name` - Guild name from the cache, fetched when absent
    pub async fn handle_member_leave(
        &self,
        guild_id: GuildId,
        user: &User,
        guild_name: Option<String>,
    ) -> Result<(), AppError> {
        let Some(settings) = self.get_settings(guild_id.get()).await? else {
            return Ok(());
        };

        if let (true, Some(channel_id)) = (settings.leave_enabled, settings.channel_id) {
            let guild = self.guild_arg(guild_id, guild_name).await?;
            let member_arg = member_arg(user);
            let args = TemplateArgs {
                member: &member_arg,
                guild: &guild,
                invite: None,
                role: None,
            };

            match template::render(&settings.leave_message, &args) {
                Ok(text) => {
                    self.announce(
                        ChannelId::new(channel_id),
                        settings.embed,
                        LEAVE_TITLE,
                        LEAVE_COLOUR,
                        text,
                        user.face(),
                    )
                    .await;
                }
                Err(e) => {
                    tracing::warn!("Leave message of guild {} is invalid: {}", guild_id, e);
                    self.announce_plain(
                        ChannelId::new(channel_id),
                        "Your `leavemessage` was improperly formatted!".to_string(),
                    )
                    .await;
                }
            }
        }

        self.sync_guild(guild_id.get()).await?;

        Ok(())
    }

    async fn guild_arg(&self, guild_id: GuildId, name: Option<String>) -> Result<GuildArg, AppError> {
        let name = match name {
            Some(name) => name,
            None => guild_id.to_partial_guild(&self.http).await?.name,
        };

        Ok(GuildArg {
            id: guild_id.get(),
            name,
        })
    }

    /// Posts a join or leave message, as an embed when the guild enabled embeds.
    async fn announce(
        &self,
        channel_id: ChannelId,
        embed: bool,
        title: &str,
        colour: u32,
        text: String,
        thumbnail: String,
    ) {
        if !embed {
            self.announce_plain(channel_id, text).await;
            return;
        }

        let embed = CreateEmbed::new()
            .title(title)
            .description(text)
            .colour(colour)
            .thumbnail(thumbnail);

        if let Err(e) = channel_id
            .send_message(&self.http, CreateMessage::new().embed(embed))
            .await
        {
            tracing::warn!("Failed to post embed in channel {}: {:?}", channel_id, e);
            self.announce_plain(channel_id, CommandError::CannotEmbed.to_string())
                .await;
        }
    }

    async fn announce_plain(&self, channel_id: ChannelId, text: String) {
        if let Err(e) = channel_id
            .send_message(&self.http, CreateMessage::new().content(text))
            .await
        {
            tracing::error!("Failed to post message in channel {}: {:?}", channel_id, e);
        }
    }
}

fn member_arg(user: &User) -> MemberArg {
    MemberArg {
        id: user.id.get(),
        name: user.name.clone(),
    }
}

/// Formats the `list` reply from `(code, role name)` pairs.
///
/// Codes are padded to eight characters so the role column lines up.
pub fn binding_list_text(bindings: &[(String, String)]) -> String {
    if bindings.is_empty() {
        return "There's no invites with roles bound to them on this server!".to_string();
    }

    let rows: String = bindings
        .iter()
        .map(|(code, role)| format!("{:<8} : {}\n", code, role))
        .collect();

    format!(
        "List of invites with roles attached to them:\n```\nInvite   : Role\n{}```",
        rows
    )
}
