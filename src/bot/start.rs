use std::sync::Arc;

use serenity::all::{Client, GatewayIntents};
use serenity::cache::Settings as CacheSettings;
use serenity::http::Http;

use crate::{bot::handler::Handler, config::Config, error::AppError, state::BotState};

/// Messages kept per channel in serenity's cache, used as a fallback when resolving the
/// author or prior content of an edited or deleted counting message.
const CACHED_MESSAGES_PER_CHANNEL: usize = 200;

/// Builds the Discord client without connecting it.
///
/// Returning the HTTP client separately lets other tasks, such as the invite resync
/// scheduler, share it before the gateway connection starts.
///
/// # Arguments
/// - `config` - Application configuration containing the bot token
/// - `state` - Shared bot state handed to the event handler
///
/// # Returns
/// - `Ok((Client, Arc<Http>))` - The client and its HTTP handle
/// - `Err(AppError::DiscordErr)` - The client could not be built
pub async fn init_bot(config: &Config, state: BotState) -> Result<(Client, Arc<Http>), AppError> {
    // MESSAGE_CONTENT and GUILD_MEMBERS are privileged intents
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_INVITES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS;

    let mut cache_settings = CacheSettings::default();
    cache_settings.max_messages = CACHED_MESSAGES_PER_CHANNEL;

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(Handler::new(state))
        .cache_settings(cache_settings)
        .await?;

    let http = client.http.clone();

    Ok((client, http))
}

/// Starts the Discord bot in a blocking manner
///
/// Should be called from within a tokio::spawn task since it will block until the bot
/// shuts down.
///
/// # Arguments
/// - `client` - Client built by `init_bot`
///
/// # Returns
/// - `Ok(())` if the bot ran and shut down cleanly
/// - `Err(AppError)` if the gateway connection fails
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
