mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;
mod util;

use crate::{
    config::Config, error::AppError, scheduler::invite_sync, service::counting::CountingService,
    state::BotState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;
    let db = startup::connect_to_database(&config).await?;

    let counting = CountingService::load_store(&db).await?;
    let state = BotState::new(db.clone(), counting, config.command_prefix.clone());

    tracing::info!("Starting guild cogs with prefix `{}`", config.command_prefix);

    // Initialize Discord bot and extract HTTP client
    let (bot_client, discord_http) = bot::start::init_bot(&config, state).await?;

    // Keep the scheduler handle alive for the lifetime of the bot
    let _scheduler = invite_sync::start_scheduler(db, discord_http).await?;

    bot::start::start_bot(bot_client).await
}
