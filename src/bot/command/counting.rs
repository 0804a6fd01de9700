//! `count` command group: registers and administers counting channels.

use serenity::all::{Context, GuildId, Message};

use crate::{
    bot::command::{ensure_guild_channel, say},
    error::{command::CommandError, AppError},
    service::counting::{engine::MAX_ADMIN_VALUE, CountingService},
    state::BotState,
    util::parse::{parse_mention, split_word},
};

const USAGE: &str = "count <add|remove|set|strict|goal> <channel> [number]";

/// Parsed `count` subcommand; every variant carries the target channel ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountCommand {
    Add(u64),
    Remove(u64),
    Set(u64, u64),
    Strict(u64),
    Goal(u64, u64),
}

impl CountCommand {
    /// Parses the arguments following `count`.
    ///
    /// # Returns
    /// - `Ok(CountCommand)` - A well-formed subcommand
    /// - `Err(CommandError::Usage)` - Unknown subcommand or missing/invalid argument
    pub fn parse(args: &str) -> Result<Self, CommandError> {
        let usage = || CommandError::Usage(USAGE.to_string());

        let (subcommand, rest) = split_word(args);
        let (channel, rest) = split_word(rest);
        let channel = parse_mention(channel, "#").ok_or_else(usage)?;
        let number = || {
            split_word(rest)
                .0
                .parse::<u64>()
                .ok()
                .filter(|value| *value <= MAX_ADMIN_VALUE)
                .ok_or_else(usage)
        };

        match subcommand.to_lowercase().as_str() {
            "add" => Ok(Self::Add(channel)),
            "remove" => Ok(Self::Remove(channel)),
            "set" => Ok(Self::Set(channel, number()?)),
            "strict" => Ok(Self::Strict(channel)),
            "goal" => Ok(Self::Goal(channel, number()?)),
            _ => Err(usage()),
        }
    }

    pub fn channel_id(&self) -> u64 {
        match *self {
            Self::Add(channel)
            | Self::Remove(channel)
            | Self::Set(channel, _)
            | Self::Strict(channel)
            | Self::Goal(channel, _) => channel,
        }
    }
}

/// Runs a `count` subcommand.
pub async fn run(
    ctx: &Context,
    state: &BotState,
    message: &Message,
    guild_id: GuildId,
    args: &str,
) -> Result<(), AppError> {
    let command = CountCommand::parse(args)?;
    ensure_guild_channel(ctx, guild_id, command.channel_id())?;

    let service = CountingService::new(&state.db, &state.counting, ctx.http.clone());
    let guild_id = guild_id.get();

    match command {
        CountCommand::Add(channel_id) => {
            if service.add_channel(guild_id, channel_id).await? {
                say(ctx, message, "Server initialized!").await;
            }
            say(ctx, message, "Channel added!").await;
        }
        CountCommand::Remove(channel_id) => {
            service.remove_channel(guild_id, channel_id).await?;
            say(ctx, message, "Channel removed!").await;
        }
        CountCommand::Set(channel_id, count) => {
            service.set_count(guild_id, channel_id, count).await?;
            say(ctx, message, format!("Channel count set to {}!", count)).await;
        }
        CountCommand::Strict(channel_id) => {
            let strict = service.toggle_strict(guild_id, channel_id).await?;
            say(
                ctx,
                message,
                format!("Strict mode set to {} for this channel!", strict),
            )
            .await;
        }
        CountCommand::Goal(channel_id, goal) => {
            service.set_goal(guild_id, channel_id, goal).await?;
            say(ctx, message, format!("Channel goal set to {}!", goal)).await;
        }
    }

    tracing::info!(
        "Applied {:?} by {} in guild {}",
        command,
        message.author.id,
        guild_id
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_subcommand() {
        assert_eq!(CountCommand::parse("add <#5>"), Ok(CountCommand::Add(5)));
        assert_eq!(CountCommand::parse("REMOVE 5"), Ok(CountCommand::Remove(5)));
        assert_eq!(CountCommand::parse("set <#5> 120"), Ok(CountCommand::Set(5, 120)));
        assert_eq!(CountCommand::parse("strict <#5>"), Ok(CountCommand::Strict(5)));
        assert_eq!(CountCommand::parse("goal <#5> 0"), Ok(CountCommand::Goal(5, 0)));
    }

    #[test]
    fn rejects_malformed_arguments() {
        let usage = Err(CommandError::Usage(USAGE.to_string()));

        assert_eq!(CountCommand::parse(""), usage);
        assert_eq!(CountCommand::parse("add"), usage);
        assert_eq!(CountCommand::parse("add general"), usage);
        assert_eq!(CountCommand::parse("set <#5>"), usage);
        assert_eq!(CountCommand::parse("goal <#5> -3"), usage);
        assert_eq!(CountCommand::parse("reset <#5>"), usage);
    }

    #[test]
    fn bounds_counts_and_goals() {
        let usage = Err(CommandError::Usage(USAGE.to_string()));
        let max = MAX_ADMIN_VALUE.to_string();
        let above = (MAX_ADMIN_VALUE + 1).to_string();

        assert_eq!(
            CountCommand::parse(&format!("set <#5> {}", max)),
            Ok(CountCommand::Set(5, MAX_ADMIN_VALUE))
        );
        assert_eq!(CountCommand::parse(&format!("set <#5> {}", above)), usage);
        assert_eq!(CountCommand::parse("set <#5> 18446744073709551615"), usage);
        assert_eq!(CountCommand::parse(&format!("goal <#5> {}", above)), usage);
    }

    #[test]
    fn exposes_target_channel() {
        assert_eq!(CountCommand::Set(9, 1).channel_id(), 9);
        assert_eq!(CountCommand::Strict(4).channel_id(), 4);
    }
}
