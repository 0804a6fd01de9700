//! Guild availability handler.
//!
//! `guild_create` fires on startup for every guild the bot is in, when it joins a new
//! guild and when a guild recovers from an outage. Invite snapshots may be stale in
//! all three cases, so guilds with invite settings are reconciled here.

use serenity::all::{Context, Guild};

use crate::{service::invite::InviteService, state::BotState};

/// Handles the guild_create event by reconciling the guild's invite snapshot.
pub async fn handle_guild_create(state: &BotState, ctx: Context, guild: Guild) {
    let guild_id = guild.id.get();
    let service = InviteService::new(&state.db, ctx.http.clone());

    match service.get_settings(guild_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return,
        Err(e) => {
            tracing::error!("Failed to load invite settings for guild {}: {:?}", guild_id, e);
            return;
        }
    }

    match service.sync_guild(guild_id).await {
        Ok(snapshot) => tracing::debug!(
            "Synced {} invites for guild {} ({})",
            snapshot.len(),
            guild.name,
            guild_id
        ),
        Err(e) => tracing::error!("Failed to sync invites for guild {}: {:?}", guild_id, e),
    }
}
