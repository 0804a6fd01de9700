use serenity::all::{Context, GuildId, Member, User};

use crate::{service::invite::InviteService, state::BotState};

fn cached_guild_name(ctx: &Context, guild_id: GuildId) -> Option<String> {
    ctx.cache.guild(guild_id).map(|guild| guild.name.clone())
}

/// Handles the guild_member_addition event when a member joins a guild
pub async fn handle_guild_member_addition(state: &BotState, ctx: Context, new_member: Member) {
    let guild_name = cached_guild_name(&ctx, new_member.guild_id);
    let service = InviteService::new(&state.db, ctx.http.clone());

    if let Err(e) = service.handle_member_join(&new_member, guild_name).await {
        tracing::error!(
            "Failed to handle join of {} in guild {}: {:?}",
            new_member.user.id,
            new_member.guild_id,
            e
        );
    }
}

/// Handles the guild_member_removal event when a member leaves a guild
pub async fn handle_guild_member_removal(
    state: &BotState,
    ctx: Context,
    guild_id: GuildId,
    user: User,
) {
    let guild_name = cached_guild_name(&ctx, guild_id);
    let service = InviteService::new(&state.db, ctx.http.clone());

    if let Err(e) = service
        .handle_member_leave(guild_id, &user, guild_name)
        .await
    {
        tracing::error!(
            "Failed to handle leave of {} in guild {}: {:?}",
            user.id,
            guild_id,
            e
        );
    }
}
