//! Reaction-based confirmation dialog for destructive invite commands.

use std::time::Duration;

use serenity::all::{
    Context, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, CreateMessage, EditMessage,
    GuildId, Message, ReactionType,
};

use crate::{
    bot::command::say,
    error::{command::CommandError, internal::InternalError, AppError},
};

const CONFIRM: &str = "\u{2705}";
const CANCEL: &str = "\u{274C}";

const PROMPT_FOOTER: &str = "Use the reactions to confirm changes.";

/// How long the caller has to react before the dialog counts as canceled.
const CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);

/// Footer the dialog is rewritten with once it is decided.
///
/// # Arguments
/// - `decision` - `Some(true)` confirmed, `Some(false)` canceled, `None` timed out
/// - `name` - Display tag of the caller
pub fn decision_footer(decision: Option<bool>, name: &str) -> String {
    match decision {
        Some(true) => format!("{} Confirmed by {}", CONFIRM, name),
        Some(false) => format!("{} Canceled by {}", CANCEL, name),
        None => format!("{} Canceled by (timed out)", CANCEL),
    }
}

/// Posts `embed` as a confirmation dialog and waits for the caller's decision.
///
/// The embed gets the guild as author and a footer asking for a reaction. Only the
/// caller's ✅ or ❌ counts. Reactions are cleared afterwards and the footer is
/// replaced with the outcome.
///
/// # Arguments
/// - `ctx` - Serenity context
/// - `message` - The command message; its channel hosts the dialog
/// - `guild_id` - Guild the command was issued in
/// - `embed` - Description and fields of the change being confirmed
///
/// # Returns
/// - `Ok(true)` - The caller confirmed
/// - `Ok(false)` - The caller canceled or the dialog timed out
/// - `Err(AppError::CommandErr)` - The dialog could not be posted or reacted to
pub async fn confirm(
    ctx: &Context,
    message: &Message,
    guild_id: GuildId,
    embed: CreateEmbed,
) -> Result<bool, AppError> {
    let (guild_name, icon_url) = {
        let guild = ctx
            .cache
            .guild(guild_id)
            .ok_or(InternalError::GuildNotCached(guild_id.get()))?;
        (guild.name.clone(), guild.icon_url())
    };

    let mut author = CreateEmbedAuthor::new(guild_name);
    if let Some(icon_url) = icon_url {
        author = author.icon_url(icon_url);
    }
    let embed = embed.author(author);

    let prompt = CreateMessage::new().embed(embed.clone().footer(CreateEmbedFooter::new(PROMPT_FOOTER)));
    let mut dialog = match message.channel_id.send_message(ctx, prompt).await {
        Ok(dialog) => dialog,
        Err(e) => {
            tracing::warn!("Failed to post confirmation dialog: {:?}", e);
            return Err(CommandError::CannotEmbed.into());
        }
    };

    for emoji in [CONFIRM, CANCEL] {
        if let Err(e) = dialog
            .react(ctx, ReactionType::Unicode(emoji.to_string()))
            .await
        {
            tracing::warn!("Failed to add confirmation reaction: {:?}", e);
            return Err(CommandError::CannotReact.into());
        }
    }

    let decision = dialog
        .await_reaction(ctx)
        .author_id(message.author.id)
        .timeout(CONFIRM_TIMEOUT)
        .filter(|reaction| reaction.emoji.unicode_eq(CONFIRM) || reaction.emoji.unicode_eq(CANCEL))
        .await
        .map(|reaction| reaction.emoji.unicode_eq(CONFIRM));

    if let Err(e) = dialog.delete_reactions(ctx).await {
        tracing::warn!("Failed to clear confirmation reactions: {:?}", e);
        say(
            ctx,
            message,
            "Was unable to clear reactions. Need MANAGE_MESSAGES permission.",
        )
        .await;
    }

    let footer = decision_footer(decision, &message.author.tag());
    if let Err(e) = dialog
        .edit(ctx, EditMessage::new().embed(embed.footer(CreateEmbedFooter::new(footer))))
        .await
    {
        tracing::warn!("Failed to update confirmation dialog: {:?}", e);
    }

    Ok(decision == Some(true))
}
