//! Error types and user-facing reply mapping.
//!
//! This module provides the application's error hierarchy. `AppError` is the top-level
//! error type that wraps domain-specific errors. Command handlers return it, and the
//! command router turns it into a chat reply through `AppError::reply`: user-facing
//! precondition failures carry their own text, everything else is logged and answered
//! with a generic message.

pub mod command;
pub mod config;
pub mod internal;

use thiserror::Error;

use crate::error::{command::CommandError, config::ConfigError, internal::InternalError};

/// Generic reply for failures the caller cannot act on.
const GENERIC_REPLY: &str = ":x: Something went wrong while running that command.";

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the bot. Most variants use
/// `#[from]` for automatic error conversion.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// A command precondition failed; the message is shown to the caller verbatim.
    #[error(transparent)]
    CommandErr(#[from] CommandError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Internal inconsistency, such as a malformed ID read back from the database.
    #[error(transparent)]
    InternalErr(#[from] InternalError),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Converts the error into the text posted back to the command caller.
    ///
    /// Command errors are expected outcomes and are returned as-is. Any other error
    /// is logged with full details and replaced by a generic message so internals
    /// never leak into the channel.
    ///
    /// # Returns
    /// - `String` - Reply text for the channel the command was issued in
    pub fn reply(&self) -> String {
        match self {
            Self::CommandErr(err) => err.to_string(),
            err => {
                tracing::error!("Command failed: {}", err);
                GENERIC_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_errors_reply_with_their_message() {
        let err = AppError::from(CommandError::NotCountingChannel);

        assert_eq!(err.reply(), ":x: This is not a counting channel!");
    }

    #[test]
    fn other_errors_reply_generically() {
        let err = AppError::from(sea_orm::DbErr::Custom("disk full".to_string()));

        assert_eq!(err.reply(), GENERIC_REPLY);
    }
}
