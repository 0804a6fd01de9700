//! Domain models for counting channels.

use std::collections::HashMap;

use crate::{
    error::AppError,
    util::parse::{count_from_stored, parse_optional_u64, parse_u64_from_string},
};

/// Live state of one counting channel.
///
/// `count` is the last accepted number, so the next message must start with
/// `count + 1`. A `goal` of 0 disables the goal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountingChannelState {
    /// Last accepted number.
    pub count: u64,
    /// Author of the last accepted message, cleared by an admin `set`.
    pub last_author_id: Option<u64>,
    /// Number that completes the channel, 0 when no goal is set.
    pub goal: u64,
    /// Whether the same author may not post two accepted counts in a row.
    pub strict: bool,
}

/// A counting channel together with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountingChannel {
    pub guild_id: u64,
    pub channel_id: u64,
    pub state: CountingChannelState,
}

impl CountingChannel {
    /// Converts an entity model to a counting channel domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(CountingChannel)` - The converted domain model
    /// - `Err(AppError::InternalErr)` - A stored ID or count could not be parsed
    pub fn from_entity(entity: entity::counting_channel::Model) -> Result<Self, AppError> {
        Ok(Self {
            guild_id: parse_u64_from_string(entity.guild_id)?,
            channel_id: parse_u64_from_string(entity.channel_id)?,
            state: CountingChannelState {
                count: count_from_stored(entity.count)?,
                last_author_id: parse_optional_u64(entity.last_author_id)?,
                goal: count_from_stored(entity.goal)?,
                strict: entity.strict,
            },
        })
    }
}

/// Counting configuration of one guild: its counting channels by channel ID.
///
/// The presence of a `GuildCountingConfig` is what marks a guild as initialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuildCountingConfig {
    pub channels: HashMap<u64, CountingChannelState>,
}

/// Parameters for creating or overwriting a counting channel row.
#[derive(Debug, Clone)]
pub struct UpsertCountingChannelParam {
    pub guild_id: u64,
    pub channel_id: u64,
    pub state: CountingChannelState,
}
