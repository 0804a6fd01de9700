use std::num::ParseIntError;
use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// Failure to parse a Discord ID stored as a String
    ///
    /// IDs are persisted as text; a row that fails to parse means the database
    /// was written by something other than this bot.
    #[error("Failed to parse ID from String '{value}': {source}")]
    ParseStringId {
        /// The string value that failed to parse
        value: String,
        /// The underlying parse error
        #[source]
        source: ParseIntError,
    },

    /// A count or goal does not fit the signed 64-bit column it is stored in.
    #[error("Counting value {0} is outside the storable range")]
    CountOutOfRange(String),

    /// The current guild is missing from the gateway cache.
    #[error("Guild {0} is not in the cache")]
    GuildNotCached(u64),

    /// A channel the bot operates on is not a guild channel.
    #[error("Channel {0} is not a guild channel")]
    ChannelNotInGuild(u64),
}
