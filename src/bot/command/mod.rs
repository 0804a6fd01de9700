//! Prefix text commands.
//!
//! Commands are grouped the way users type them: `count`, `globalrole` and `invutil`.
//! The router splits the prefix and group name off a message, checks the group's
//! permission gate and hands the remaining arguments to the group. Any error a group
//! returns is turned into a reply through `AppError::reply`.

pub mod counting;
pub mod global_role;
pub mod invite;

use serenity::all::{ChannelId, Context, GuildId, Message, Permissions};

use crate::{
    error::{command::CommandError, internal::InternalError, AppError},
    service::permission::member_standing,
    state::BotState,
    util::parse::split_word,
};

/// A top-level command group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Count,
    GlobalRole,
    InvUtil,
}

impl CommandGroup {
    /// Parses a group name case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "count" => Some(Self::Count),
            "globalrole" => Some(Self::GlobalRole),
            "invutil" => Some(Self::InvUtil),
            _ => None,
        }
    }

    /// Permission a caller needs for a subcommand, with its display name.
    ///
    /// # Returns
    /// - `Some((Permissions, &str))` - Required permission
    /// - `None` - The subcommand is open to everyone
    pub fn required_permission(&self, subcommand: &str) -> Option<(Permissions, &'static str)> {
        match self {
            Self::Count => Some((Permissions::ADMINISTRATOR, "Administrator")),
            Self::GlobalRole => Some((Permissions::MANAGE_ROLES, "Manage Roles")),
            Self::InvUtil if subcommand.eq_ignore_ascii_case("examples") => None,
            Self::InvUtil => Some((Permissions::MANAGE_GUILD, "Manage Server")),
        }
    }
}

/// Whether `held` satisfies `required`; administrators pass every gate.
pub fn is_permitted(held: Permissions, required: Permissions) -> bool {
    held.administrator() || held.contains(required)
}

/// Splits a message into group name and arguments.
///
/// # Returns
/// - `Some((group, args))` - The message starts with the prefix and a word
/// - `None` - The message is not a command
pub fn split_command<'a>(prefix: &str, content: &'a str) -> Option<(&'a str, &'a str)> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    if rest.starts_with(char::is_whitespace) {
        return None;
    }

    match split_word(rest) {
        ("", _) => None,
        split => Some(split),
    }
}

/// Runs the command in `message`, if it is one.
///
/// # Returns
/// - `true` - The message was a command (whether or not it succeeded)
/// - `false` - The message is not addressed to any command group
pub async fn dispatch(ctx: &Context, state: &BotState, message: &Message) -> bool {
    let Some((name, args)) = split_command(&state.prefix, &message.content) else {
        return false;
    };
    let Some(group) = CommandGroup::parse(name) else {
        return false;
    };

    tracing::debug!(
        "Command {:?} from {} in channel {}: {}",
        group,
        message.author.id,
        message.channel_id,
        args
    );

    if let Err(e) = run(ctx, state, message, group, args).await {
        say(ctx, message, e.reply()).await;
    }

    true
}

async fn run(
    ctx: &Context,
    state: &BotState,
    message: &Message,
    group: CommandGroup,
    args: &str,
) -> Result<(), AppError> {
    let guild_id = message.guild_id.ok_or(CommandError::GuildOnly)?;

    let (subcommand, _) = split_word(args);
    if let Some((required, name)) = group.required_permission(subcommand) {
        let caller = member_standing(ctx, guild_id, message.author.id).await?;
        if !is_permitted(caller.permissions, required) {
            return Err(CommandError::MissingPermission(name).into());
        }
    }

    match group {
        CommandGroup::Count => counting::run(ctx, state, message, guild_id, args).await,
        CommandGroup::GlobalRole => global_role::run(ctx, state, message, guild_id, args).await,
        CommandGroup::InvUtil => invite::run(ctx, state, message, guild_id, args).await,
    }
}

/// Posts a plain reply in the channel the command came from.
pub async fn say(ctx: &Context, message: &Message, text: impl Into<String>) {
    if let Err(e) = message.channel_id.say(ctx, text).await {
        tracing::error!(
            "Failed to reply in channel {}: {:?}",
            message.channel_id,
            e
        );
    }
}

/// Checks that a channel belongs to the guild and is visible in the cache.
fn ensure_guild_channel(ctx: &Context, guild_id: GuildId, channel_id: u64) -> Result<(), AppError> {
    let guild = ctx
        .cache
        .guild(guild_id)
        .ok_or(InternalError::GuildNotCached(guild_id.get()))?;

    if !guild.channels.contains_key(&ChannelId::new(channel_id)) {
        return Err(CommandError::UnknownChannel.into());
    }

    Ok(())
}
