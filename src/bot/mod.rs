//! Discord bot integration: gateway events and text commands.
//!
//! The bot is initialized during startup and runs in a separate tokio task. Its HTTP
//! client is shared with the invite resync scheduler so both post through the same
//! rate limiter.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Guild availability and the channel/role cache
//! - `GUILD_MESSAGES` - Counting messages, edits, deletions and commands
//! - `MESSAGE_CONTENT` - Reading message text (privileged intent)
//! - `GUILD_MEMBERS` - Member joins, leaves and roster pages (privileged intent)
//! - `GUILD_INVITES` - Invite events keep the invite cache warm
//! - `GUILD_MESSAGE_REACTIONS` - Confirmation dialogs
//!
//! Note: privileged intents must be explicitly enabled in the Discord Developer Portal
//! for the bot application.

pub mod command;
pub mod confirm;
pub mod handler;
pub mod start;
