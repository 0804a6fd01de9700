//! `globalrole` command group: starts and stops bulk role jobs.

use serenity::all::{Context, GuildId, Message};

use crate::{
    bot::command::say,
    error::{command::CommandError, AppError},
    model::bulk_role::{BulkRoleOperation, BulkRoleRequest},
    service::{
        bulk_role::{self, DiscordBulkRoleSurface},
        permission::{check_role_manageable, guild_roles, member_standing, resolve_role},
    },
    state::BotState,
    util::parse::split_word,
};

const USAGE: &str = "globalrole <add|remove|apply|stop> <role>[;<filterRole>]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalRoleCommand {
    Stop,
    Start {
        operation: BulkRoleOperation,
        role: String,
        filter: Option<String>,
    },
}

impl GlobalRoleCommand {
    /// Parses `<operation> <role>[;<filterRole>]`; role names may contain spaces.
    pub fn parse(args: &str) -> Result<Self, CommandError> {
        let (operation, rest) = split_word(args);
        if operation.is_empty() {
            return Err(CommandError::Usage(USAGE.to_string()));
        }
        if operation.eq_ignore_ascii_case("stop") {
            return Ok(Self::Stop);
        }

        let operation = BulkRoleOperation::parse(operation).ok_or(CommandError::InvalidOperation)?;

        let (role, filter) = match rest.split_once(';') {
            Some((role, filter)) => (role.trim(), Some(filter.trim()).filter(|f| !f.is_empty())),
            None => (rest, None),
        };
        if role.is_empty() {
            return Err(CommandError::Usage(USAGE.to_string()));
        }

        Ok(Self::Start {
            operation,
            role: role.to_string(),
            filter: filter.map(str::to_string),
        })
    }
}

/// Runs a `globalrole` subcommand.
///
/// A start request is validated in full before the job slot is claimed; the job itself
/// runs in a spawned task so the command returns immediately.
pub async fn run(
    ctx: &Context,
    state: &BotState,
    message: &Message,
    guild_id: GuildId,
    args: &str,
) -> Result<(), AppError> {
    let (operation, role, filter) = match GlobalRoleCommand::parse(args)? {
        GlobalRoleCommand::Stop => {
            if !state.bulk_role.request_cancel().await {
                return Err(CommandError::NoBulkJobRunning.into());
            }
            say(ctx, message, "Stopping...").await;
            return Ok(());
        }
        GlobalRoleCommand::Start {
            operation,
            role,
            filter,
        } => (operation, role, filter),
    };

    if state.bulk_role.is_running().await {
        return Err(CommandError::BulkJobRunning.into());
    }

    let roles = guild_roles(ctx, guild_id)?;
    let role = resolve_role(&role, &roles).ok_or(CommandError::UnknownRole)?;
    let filter = filter
        .map(|filter| resolve_role(&filter, &roles).ok_or(CommandError::UnknownRole))
        .transpose()?;
    if operation == BulkRoleOperation::Apply && filter.is_none() {
        return Err(CommandError::ApplyNeedsFilter.into());
    }

    let bot_id = ctx.cache.current_user().id;
    let caller = member_standing(ctx, guild_id, message.author.id).await?;
    let bot = member_standing(ctx, guild_id, bot_id).await?;
    check_role_manageable(role, &caller, &bot)?;

    if !state.bulk_role.try_start().await {
        return Err(CommandError::BulkJobRunning.into());
    }

    let request = BulkRoleRequest {
        operation,
        role_id: role.id.get(),
        role_name: role.name.clone(),
        filter_role_id: filter.map(|filter| filter.id.get()),
    };

    tracing::info!(
        "{} started bulk role {} of `{}` in guild {}",
        message.author.id,
        operation,
        request.role_name,
        guild_id
    );

    let surface = DiscordBulkRoleSurface::new(ctx.http.clone(), guild_id, message.channel_id);
    let job = state.bulk_role.clone();
    tokio::spawn(async move {
        let roster = match surface.fetch_roster().await {
            Ok(roster) => roster,
            Err(e) => {
                tracing::error!("Failed to fetch member roster for guild {}: {:?}", guild_id, e);
                job.finish().await;
                return;
            }
        };

        let summary = bulk_role::run(&surface, &job, &request, &roster).await;

        tracing::info!(
            "Bulk role {} in guild {} finished: {:?}",
            request.operation,
            guild_id,
            summary
        );
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stop() {
        assert_eq!(GlobalRoleCommand::parse("STOP"), Ok(GlobalRoleCommand::Stop));
    }

    #[test]
    fn parses_role_and_filter() {
        assert_eq!(
            GlobalRoleCommand::parse("add Server Member"),
            Ok(GlobalRoleCommand::Start {
                operation: BulkRoleOperation::Add,
                role: "Server Member".to_string(),
                filter: None,
            })
        );
        assert_eq!(
            GlobalRoleCommand::parse("apply <@&3> ; Verified "),
            Ok(GlobalRoleCommand::Start {
                operation: BulkRoleOperation::Apply,
                role: "<@&3>".to_string(),
                filter: Some("Verified".to_string()),
            })
        );
        assert_eq!(
            GlobalRoleCommand::parse("remove Muted;"),
            Ok(GlobalRoleCommand::Start {
                operation: BulkRoleOperation::Remove,
                role: "Muted".to_string(),
                filter: None,
            })
        );
    }

    #[test]
    fn rejects_unknown_operation_and_missing_role() {
        assert_eq!(
            GlobalRoleCommand::parse("grant Member"),
            Err(CommandError::InvalidOperation)
        );
        assert_eq!(
            GlobalRoleCommand::parse("add"),
            Err(CommandError::Usage(USAGE.to_string()))
        );
        assert_eq!(
            GlobalRoleCommand::parse(""),
            Err(CommandError::Usage(USAGE.to_string()))
        );
    }
}
