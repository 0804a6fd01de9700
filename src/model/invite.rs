//! Domain models for invite tracking and welcome messages.

use serenity::all::RichInvite;

use crate::{
    error::AppError,
    util::parse::{parse_optional_u64, parse_u64_from_string},
};

pub const DEFAULT_JOIN_MESSAGE: &str = "{0.mention} has joined!";
pub const DEFAULT_LEAVE_MESSAGE: &str = "{0.mention} has left!";

/// Invite utility settings for a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteGuildSettings {
    pub guild_id: u64,
    /// Channel that receives join/leave messages.
    pub channel_id: Option<u64>,
    /// Post messages as embeds instead of plain text.
    pub embed: bool,
    pub join_message: String,
    pub leave_message: String,
    pub join_enabled: bool,
    pub leave_enabled: bool,
    /// Role granted to bot accounts when they join.
    pub bot_role_id: Option<u64>,
    pub bot_role_enabled: bool,
}

impl InviteGuildSettings {
    /// Creates the default settings a guild starts with on first use.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    ///
    /// # Returns
    /// - `InviteGuildSettings` - Settings with no channel and all messages disabled
    pub fn new(guild_id: u64) -> Self {
        Self {
            guild_id,
            channel_id: None,
            embed: false,
            join_message: DEFAULT_JOIN_MESSAGE.to_string(),
            leave_message: DEFAULT_LEAVE_MESSAGE.to_string(),
            join_enabled: false,
            leave_enabled: false,
            bot_role_id: None,
            bot_role_enabled: false,
        }
    }

    /// Converts an entity model to the settings domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(InviteGuildSettings)` - The converted domain model
    /// - `Err(AppError::InternalErr)` - A stored ID could not be parsed
    pub fn from_entity(entity: entity::invite_guild::Model) -> Result<Self, AppError> {
        Ok(Self {
            guild_id: parse_u64_from_string(entity.guild_id)?,
            channel_id: parse_optional_u64(entity.channel_id)?,
            embed: entity.embed,
            join_message: entity.join_message,
            leave_message: entity.leave_message,
            join_enabled: entity.join_enabled,
            leave_enabled: entity.leave_enabled,
            bot_role_id: parse_optional_u64(entity.bot_role_id)?,
            bot_role_enabled: entity.bot_role_enabled,
        })
    }
}

/// Last observed state of an invite, as persisted between reconciliations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedInvite {
    pub code: String,
    pub uses: u64,
    /// Role granted to members who join through this invite.
    pub role_id: Option<u64>,
}

impl TrackedInvite {
    /// Converts an entity model to a tracked invite at the repository boundary.
    pub fn from_entity(entity: entity::tracked_invite::Model) -> Result<Self, AppError> {
        Ok(Self {
            code: entity.code,
            uses: entity.uses.max(0) as u64,
            role_id: parse_optional_u64(entity.role_id)?,
        })
    }

    /// Full invite link for the code.
    pub fn url(&self) -> String {
        format!("https://discord.gg/{}", self.code)
    }
}

/// An invite as currently reported by Discord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveInvite {
    pub code: String,
    pub uses: u64,
    /// Display name of the invite's creator, when Discord reports one.
    pub inviter: Option<String>,
}

impl LiveInvite {
    /// Code and inviter substituted into messages when the invite is undetermined.
    pub const UNKNOWN: &'static str = "unknown";

    /// Converts a Serenity invite into the fields the tracker needs.
    pub fn from_rich_invite(invite: &RichInvite) -> Self {
        Self {
            code: invite.code.clone(),
            uses: invite.uses,
            inviter: invite.inviter.as_ref().map(|user| user.name.clone()),
        }
    }

    /// Placeholder used in welcome messages when attribution fails.
    pub fn placeholder() -> Self {
        Self {
            code: Self::UNKNOWN.to_string(),
            uses: 0,
            inviter: None,
        }
    }

    /// Full invite link for the code.
    pub fn url(&self) -> String {
        format!("https://discord.gg/{}", self.code)
    }
}

/// Outcome of inferring which invite a new member used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribution {
    /// Exactly one invite's use count explains the join.
    Determined(LiveInvite),
    /// Zero or several invites could explain the join.
    Undetermined,
}
