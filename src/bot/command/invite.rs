//! `invutil` command group: invite tracking and welcome message settings.

use serenity::all::{
    ChannelId, Context, CreateEmbed, CreateEmbedAuthor, CreateMessage, GuildId, Message,
    Permissions, RoleId,
};

use crate::{
    bot::{
        command::{ensure_guild_channel, say},
        confirm::confirm,
    },
    error::{command::CommandError, internal::InternalError, AppError},
    model::invite::InviteGuildSettings,
    service::{
        invite::{binding_list_text, template, InviteService},
        permission::{guild_roles, member_standing, resolve_role},
    },
    state::BotState,
    util::parse::{parse_invite_code, parse_mention, split_word},
};

const USAGE: &str = "invutil <channel|joinmessage|leavemessage|botrole|embed|togglej|togglel|addrole|removerole|list|disable|info|examples>";

/// Name shown for a bound role that no longer exists.
const DELETED_ROLE: &str = "deleted-role";

/// Parsed `invutil` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteCommand {
    Channel(u64),
    JoinMessage(String),
    LeaveMessage(String),
    /// `None` disables the bot role.
    BotRole(Option<String>),
    Embed,
    ToggleJoin,
    ToggleLeave,
    AddRole { code: String, role: String },
    RemoveRole(String),
    List,
    Disable,
    Info,
    Examples,
}

impl InviteCommand {
    /// Parses the arguments following `invutil`.
    ///
    /// Invite arguments are normalized to bare codes; message and role arguments keep
    /// their inner whitespace.
    pub fn parse(args: &str) -> Result<Self, CommandError> {
        let usage = |line: &str| CommandError::Usage(format!("invutil {}", line));

        let (subcommand, rest) = split_word(args);
        let command = match subcommand.to_lowercase().as_str() {
            "channel" => Self::Channel(
                parse_mention(rest, "#").ok_or_else(|| usage("channel <channel>"))?,
            ),
            "joinmessage" if !rest.is_empty() => Self::JoinMessage(rest.to_string()),
            "joinmessage" => return Err(usage("joinmessage <message>")),
            "leavemessage" if !rest.is_empty() => Self::LeaveMessage(rest.to_string()),
            "leavemessage" => return Err(usage("leavemessage <message>")),
            "botrole" if rest.eq_ignore_ascii_case("none") => Self::BotRole(None),
            "botrole" if !rest.is_empty() => Self::BotRole(Some(rest.to_string())),
            "botrole" => return Err(usage("botrole <role|none>")),
            "embed" => Self::Embed,
            "togglej" => Self::ToggleJoin,
            "togglel" => Self::ToggleLeave,
            "addrole" => match split_word(rest) {
                (invite, role) if !invite.is_empty() && !role.is_empty() => Self::AddRole {
                    code: parse_invite_code(invite),
                    role: role.to_string(),
                },
                _ => return Err(usage("addrole <invite> <role>")),
            },
            "removerole" => match split_word(rest) {
                ("", _) => return Err(usage("removerole <invite>")),
                (invite, _) => Self::RemoveRole(parse_invite_code(invite)),
            },
            "list" => Self::List,
            "disable" => Self::Disable,
            "info" => Self::Info,
            "examples" => Self::Examples,
            _ => return Err(CommandError::Usage(USAGE.to_string())),
        };

        Ok(command)
    }
}

/// Runs an `invutil` subcommand.
pub async fn run(
    ctx: &Context,
    state: &BotState,
    message: &Message,
    guild_id: GuildId,
    args: &str,
) -> Result<(), AppError> {
    let command = InviteCommand::parse(args)?;
    let service = InviteService::new(&state.db, ctx.http.clone());

    match command {
        InviteCommand::Channel(channel_id) => {
            set_channel(ctx, &service, message, guild_id, channel_id).await
        }
        InviteCommand::JoinMessage(text) => {
            let mut settings = service.get_or_default_settings(guild_id.get()).await?;
            settings.join_message = text;
            service.save_settings(&settings).await?;
            say(ctx, message, "Join message has been set.").await;
            Ok(())
        }
        InviteCommand::LeaveMessage(text) => {
            let mut settings = service.get_or_default_settings(guild_id.get()).await?;
            settings.leave_message = text;
            service.save_settings(&settings).await?;
            say(ctx, message, "Leave message has been set.").await;
            Ok(())
        }
        InviteCommand::BotRole(role) => {
            set_bot_role(ctx, &service, message, guild_id, role.as_deref()).await
        }
        InviteCommand::Embed => toggle_embed(ctx, &service, message, guild_id).await,
        InviteCommand::ToggleJoin => {
            let mut settings = service
                .get_settings(guild_id.get())
                .await?
                .ok_or(CommandError::NothingToToggle)?;
            settings.join_enabled = !settings.join_enabled;
            service.save_settings(&settings).await?;

            let text = if settings.join_enabled {
                "Join messages are now enabled."
            } else {
                "Join messages are now disabled."
            };
            say(ctx, message, text).await;
            Ok(())
        }
        InviteCommand::ToggleLeave => {
            let mut settings = service
                .get_settings(guild_id.get())
                .await?
                .ok_or(CommandError::NothingToToggle)?;
            settings.leave_enabled = !settings.leave_enabled;
            service.save_settings(&settings).await?;

            let text = if settings.leave_enabled {
                "Leave messages are now enabled."
            } else {
                "Leave messages are now disabled."
            };
            say(ctx, message, text).await;
            Ok(())
        }
        InviteCommand::AddRole { code, role } => {
            add_role(ctx, &service, message, guild_id, &code, &role).await
        }
        InviteCommand::RemoveRole(code) => {
            remove_role(ctx, &service, message, guild_id, &code).await
        }
        InviteCommand::List => {
            let roles = guild_roles(ctx, guild_id)?;
            let bindings: Vec<(String, String)> = service
                .tracked_invites(guild_id.get())
                .await?
                .into_iter()
                .filter_map(|invite| {
                    let role_id = invite.role_id?;
                    let name = roles
                        .get(&RoleId::new(role_id))
                        .map(|role| role.name.clone())
                        .unwrap_or_else(|| DELETED_ROLE.to_string());
                    Some((invite.code, name))
                })
                .collect();

            say(ctx, message, binding_list_text(&bindings)).await;
            Ok(())
        }
        InviteCommand::Disable => {
            if service.get_settings(guild_id.get()).await?.is_none() {
                return Err(CommandError::InvitesNeverEnabled.into());
            }

            let embed = CreateEmbed::new().description(
                "You are about to delete all settings for this server.\nDo you really want to do it?",
            );
            if confirm(ctx, message, guild_id, embed).await? {
                service.delete_settings(guild_id.get()).await?;
                tracing::info!("Deleted invite settings of guild {}", guild_id);
                say(ctx, message, "Successfully deleted all settings for this server.").await;
            }
            Ok(())
        }
        InviteCommand::Info => show_info(ctx, &service, message, guild_id).await,
        InviteCommand::Examples => {
            say(ctx, message, template::EXAMPLES).await;
            Ok(())
        }
    }
}

/// Effective permissions of the bot in a guild channel.
///
/// # Returns
/// - `Ok(Some(Permissions))` - The channel exists in the guild
/// - `Ok(None)` - The channel is not part of the guild
async fn bot_permissions_in(
    ctx: &Context,
    guild_id: GuildId,
    channel_id: ChannelId,
) -> Result<Option<Permissions>, AppError> {
    let bot_id = ctx.cache.current_user().id;
    let bot_member = guild_id.member(ctx, bot_id).await?;

    let guild = ctx
        .cache
        .guild(guild_id)
        .ok_or(InternalError::GuildNotCached(guild_id.get()))?;

    Ok(guild
        .channels
        .get(&channel_id)
        .map(|channel| guild.user_permissions_in(channel, &bot_member)))
}

async fn set_channel(
    ctx: &Context,
    service: &InviteService<'_>,
    message: &Message,
    guild_id: GuildId,
    channel_id: u64,
) -> Result<(), AppError> {
    ensure_guild_channel(ctx, guild_id, channel_id)?;

    let permissions = bot_permissions_in(ctx, guild_id, ChannelId::new(channel_id))
        .await?
        .ok_or(CommandError::UnknownChannel)?;
    if !permissions.send_messages() {
        return Err(CommandError::CannotSendIn(channel_id).into());
    }

    let mut settings = service.get_or_default_settings(guild_id.get()).await?;
    settings.channel_id = Some(channel_id);
    service.save_settings(&settings).await?;

    say(ctx, message, format!("Channel has been set to <#{}>.", channel_id)).await;

    Ok(())
}

/// Sets or disables the role granted to joining bots.
///
/// Setting a role requires MANAGE_ROLES for both caller and bot, and the role must
/// sit below the bot's highest role.
async fn set_bot_role(
    ctx: &Context,
    service: &InviteService<'_>,
    message: &Message,
    guild_id: GuildId,
    role: Option<&str>,
) -> Result<(), AppError> {
    let mut settings = service.get_or_default_settings(guild_id.get()).await?;

    let Some(role) = role else {
        settings.bot_role_id = None;
        settings.bot_role_enabled = false;
        service.save_settings(&settings).await?;
        say(ctx, message, "The bot role has been disabled.").await;
        return Ok(());
    };

    let roles = guild_roles(ctx, guild_id)?;
    let role = resolve_role(role, &roles).ok_or(CommandError::UnknownRole)?;

    let bot_id = ctx.cache.current_user().id;
    let caller = member_standing(ctx, guild_id, message.author.id).await?;
    let bot = member_standing(ctx, guild_id, bot_id).await?;
    if !caller.can_manage_roles() {
        return Err(CommandError::CallerMissingManageRoles.into());
    }
    if !bot.can_manage_roles() {
        return Err(CommandError::BotMissingManageRoles.into());
    }
    if !bot.outranks(role) {
        return Err(CommandError::CannotAssignRole.into());
    }

    settings.bot_role_id = Some(role.id.get());
    settings.bot_role_enabled = true;
    service.save_settings(&settings).await?;

    say(ctx, message, "The bot role has been set.").await;

    Ok(())
}

async fn toggle_embed(
    ctx: &Context,
    service: &InviteService<'_>,
    message: &Message,
    guild_id: GuildId,
) -> Result<(), AppError> {
    let mut settings = service
        .get_settings(guild_id.get())
        .await?
        .ok_or(CommandError::NothingToToggle)?;
    let channel_id = settings.channel_id.ok_or(CommandError::NothingToToggle)?;

    let permissions = bot_permissions_in(ctx, guild_id, ChannelId::new(channel_id))
        .await?
        .ok_or(CommandError::NothingToToggle)?;
    if !permissions.embed_links() {
        return Err(CommandError::CannotEmbed.into());
    }

    settings.embed = !settings.embed;
    service.save_settings(&settings).await?;

    let text = if settings.embed {
        "Messages will now be embedded."
    } else {
        "Messages will no longer be embedded."
    };
    say(ctx, message, text).await;

    Ok(())
}

/// Binds a role to a live invite, asking before replacing an existing binding.
async fn add_role(
    ctx: &Context,
    service: &InviteService<'_>,
    message: &Message,
    guild_id: GuildId,
    code: &str,
    role: &str,
) -> Result<(), AppError> {
    let roles = guild_roles(ctx, guild_id)?;
    let role = resolve_role(role, &roles).ok_or(CommandError::UnknownRole)?;

    let bot_id = ctx.cache.current_user().id;
    let bot = member_standing(ctx, guild_id, bot_id).await?;
    if !bot.outranks(role) {
        return Err(CommandError::CannotAssignRole.into());
    }

    // The snapshot only exists for guilds with settings
    if service.get_settings(guild_id.get()).await?.is_none() {
        service
            .save_settings(&InviteGuildSettings::new(guild_id.get()))
            .await?;
    }

    let snapshot = service.sync_guild(guild_id.get()).await?;
    let invite = snapshot
        .iter()
        .find(|invite| invite.code == code)
        .ok_or(CommandError::UnknownInvite)?;

    let current = invite
        .role_id
        .and_then(|role_id| roles.get(&RoleId::new(role_id)));
    if let Some(current) = current {
        let embed = CreateEmbed::new()
            .description("This invite already has a role assigned to it. Replace?")
            .field("Invite", invite.url(), false)
            .field("Current Role", current.name.clone(), true)
            .field("Replacing Role", role.name.clone(), true);

        if !confirm(ctx, message, guild_id, embed).await? {
            return Ok(());
        }
    }

    service
        .bind_role(guild_id.get(), code, Some(role.id.get()))
        .await?;

    say(
        ctx,
        message,
        format!("The `{}` role is now bound to the `{}` invite.", role.name, code),
    )
    .await;

    Ok(())
}

async fn remove_role(
    ctx: &Context,
    service: &InviteService<'_>,
    message: &Message,
    guild_id: GuildId,
    code: &str,
) -> Result<(), AppError> {
    let tracked = service.tracked_invites(guild_id.get()).await?;
    let (url, role_id) = tracked
        .iter()
        .find(|invite| invite.code == code)
        .and_then(|invite| invite.role_id.map(|role_id| (invite.url(), role_id)))
        .ok_or(CommandError::InviteHasNoRole)?;

    let role_name = guild_roles(ctx, guild_id)?
        .get(&RoleId::new(role_id))
        .map(|role| role.name.clone())
        .unwrap_or_else(|| DELETED_ROLE.to_string());

    let embed = CreateEmbed::new()
        .description("You are about to delete a role-invite link:")
        .field("Invite", url, false)
        .field("Role", role_name.clone(), false);

    if confirm(ctx, message, guild_id, embed).await? {
        service.bind_role(guild_id.get(), code, None).await?;
        say(
            ctx,
            message,
            format!(
                "The link has been removed, users won't get {} role anymore when joining with this invite.",
                role_name
            ),
        )
        .await;
    }

    Ok(())
}

/// Posts the settings embed, then reconciles the invite snapshot.
async fn show_info(
    ctx: &Context,
    service: &InviteService<'_>,
    message: &Message,
    guild_id: GuildId,
) -> Result<(), AppError> {
    let stored = service.get_settings(guild_id.get()).await?;
    let settings = stored
        .clone()
        .unwrap_or_else(|| InviteGuildSettings::new(guild_id.get()));

    let (guild_name, icon_url, channel, bot_role) = {
        let guild = ctx
            .cache
            .guild(guild_id)
            .ok_or(InternalError::GuildNotCached(guild_id.get()))?;

        let channel = settings
            .channel_id
            .and_then(|id| guild.channels.get(&ChannelId::new(id)))
            .map(|channel| format!("#{}", channel.name));
        let bot_role = settings
            .bot_role_id
            .and_then(|id| guild.roles.get(&RoleId::new(id)))
            .map(|role| role.name.clone());

        (guild.name.clone(), guild.icon_url(), channel, bot_role)
    };

    let mut author = CreateEmbedAuthor::new(format!("Settings for {}", guild_name));
    if let Some(icon_url) = icon_url {
        author = author.icon_url(icon_url);
    }

    let none = || "None".to_string();
    let embed = CreateEmbed::new()
        .author(author)
        .field("Channel:", channel.unwrap_or_else(none), true)
        .field("Join Message Enabled:", settings.join_enabled.to_string(), true)
        .field("Leave Message Enabled:", settings.leave_enabled.to_string(), true)
        .field("Bot Role:", bot_role.unwrap_or_else(none), true)
        .field("Bot Role Enabled:", settings.bot_role_enabled.to_string(), true)
        .field("Embed", settings.embed.to_string(), true)
        .field("Join Message:", settings.join_message.clone(), false)
        .field("Leave Message:", settings.leave_message.clone(), false);

    if let Err(e) = message
        .channel_id
        .send_message(ctx, CreateMessage::new().embed(embed))
        .await
    {
        tracing::warn!("Failed to post settings embed: {:?}", e);
        return Err(CommandError::CannotEmbed.into());
    }

    if stored.is_some() {
        service.sync_guild(guild_id.get()).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_settings_commands() {
        assert_eq!(InviteCommand::parse("channel <#12>"), Ok(InviteCommand::Channel(12)));
        assert_eq!(
            InviteCommand::parse("joinmessage Welcome {0.mention} to {1.name}!"),
            Ok(InviteCommand::JoinMessage(
                "Welcome {0.mention} to {1.name}!".to_string()
            ))
        );
        assert_eq!(
            InviteCommand::parse("leavemessage  bye {0.name} "),
            Ok(InviteCommand::LeaveMessage("bye {0.name}".to_string()))
        );
        assert_eq!(InviteCommand::parse("botrole None"), Ok(InviteCommand::BotRole(None)));
        assert_eq!(
            InviteCommand::parse("botrole Robot Friends"),
            Ok(InviteCommand::BotRole(Some("Robot Friends".to_string())))
        );
        assert_eq!(InviteCommand::parse("EMBED"), Ok(InviteCommand::Embed));
        assert_eq!(InviteCommand::parse("togglej"), Ok(InviteCommand::ToggleJoin));
        assert_eq!(InviteCommand::parse("togglel"), Ok(InviteCommand::ToggleLeave));
    }

    #[test]
    fn parses_invite_commands() {
        assert_eq!(
            InviteCommand::parse("addrole https://discord.gg/abc123 Guests"),
            Ok(InviteCommand::AddRole {
                code: "abc123".to_string(),
                role: "Guests".to_string(),
            })
        );
        assert_eq!(
            InviteCommand::parse("removerole abc123"),
            Ok(InviteCommand::RemoveRole("abc123".to_string()))
        );
        assert_eq!(InviteCommand::parse("list"), Ok(InviteCommand::List));
        assert_eq!(InviteCommand::parse("disable"), Ok(InviteCommand::Disable));
        assert_eq!(InviteCommand::parse("info"), Ok(InviteCommand::Info));
        assert_eq!(InviteCommand::parse("examples"), Ok(InviteCommand::Examples));
    }

    #[test]
    fn rejects_missing_arguments() {
        assert_eq!(
            InviteCommand::parse("channel general"),
            Err(CommandError::Usage("invutil channel <channel>".to_string()))
        );
        assert_eq!(
            InviteCommand::parse("joinmessage"),
            Err(CommandError::Usage("invutil joinmessage <message>".to_string()))
        );
        assert_eq!(
            InviteCommand::parse("addrole abc123"),
            Err(CommandError::Usage("invutil addrole <invite> <role>".to_string()))
        );
        assert_eq!(
            InviteCommand::parse("removerole"),
            Err(CommandError::Usage("invutil removerole <invite>".to_string()))
        );
        assert_eq!(
            InviteCommand::parse(""),
            Err(CommandError::Usage(USAGE.to_string()))
        );
    }
}
