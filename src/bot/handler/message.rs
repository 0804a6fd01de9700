//! Message event handlers.
//!
//! New messages go through the command router first and then through the counting
//! engine, so a command typed into a counting channel is judged as a count as well.
//! Edits and deletions only matter to the counting engine.

use serenity::all::{ChannelId, Context, GuildId, Message, MessageId, MessageUpdateEvent};

use crate::{
    bot::command,
    service::counting::{CountingEdit, CountingMessage, CountingService},
    state::BotState,
};

/// Handles a new message.
pub async fn handle_message(state: &BotState, ctx: Context, message: Message) {
    if message.author.bot {
        return;
    }

    command::dispatch(&ctx, state, &message).await;

    let Some(counting_message) = CountingMessage::from_message(&message) else {
        return;
    };

    let service = CountingService::new(&state.db, &state.counting, ctx.http.clone());
    if let Err(e) = service.handle_message(&counting_message).await {
        tracing::error!(
            "Failed to handle counting message {} in channel {}: {:?}",
            message.id,
            message.channel_id,
            e
        );
    }
}

/// Handles a message edit.
///
/// `old_if_available` comes from serenity's message cache and is only used when the
/// counting engine has no record of the message.
pub async fn handle_message_update(
    state: &BotState,
    ctx: Context,
    old_if_available: Option<Message>,
    event: MessageUpdateEvent,
) {
    let Some(guild_id) = event.guild_id else {
        return;
    };

    let edit = CountingEdit {
        guild_id: guild_id.get(),
        channel_id: event.channel_id.get(),
        message_id: event.id.get(),
        cached_before: old_if_available.map(|old| (old.author.id.get(), old.content)),
        after: event.content,
    };

    let bot_user_id = ctx.cache.current_user().id.get();
    let service = CountingService::new(&state.db, &state.counting, ctx.http.clone());

    if let Err(e) = service.handle_edit(edit, bot_user_id).await {
        tracing::error!(
            "Failed to handle edit of message {} in channel {}: {:?}",
            event.id,
            event.channel_id,
            e
        );
    }
}

/// Handles a message deletion.
pub async fn handle_message_delete(
    state: &BotState,
    ctx: Context,
    channel_id: ChannelId,
    message_id: MessageId,
    guild_id: Option<GuildId>,
) {
    let Some(guild_id) = guild_id else {
        return;
    };

    let cached_author = ctx
        .cache
        .message(channel_id, message_id)
        .map(|message| message.author.id.get());
    let bot_user_id = ctx.cache.current_user().id.get();

    CountingService::new(&state.db, &state.counting, ctx.http.clone())
        .handle_delete(
            guild_id.get(),
            channel_id.get(),
            message_id.get(),
            cached_author,
            bot_user_id,
        )
        .await;
}
