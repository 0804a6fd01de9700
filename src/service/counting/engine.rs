//! Pure counting state machine.
//!
//! Nothing in this module talks to Discord. `CountingChannelState::evaluate` decides
//! what a message means for a channel and mutates the state when the message is
//! accepted; the caller is responsible for applying the resulting `CountOutcome`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::counting::CountingChannelState;

lazy_static! {
    static ref LEADING_INTEGER_RE: Regex =
        Regex::new(r"^(0|[1-9][0-9]*)(?:\s|$)").expect("leading integer pattern is valid");
}

/// Accepted counts are flushed to the database every this many increments.
pub const PERSIST_INTERVAL: u64 = 10;

/// Highest count a channel can reach. Counts are stored as signed 64-bit integers.
pub const COUNT_LIMIT: u64 = i64::MAX as u64;

/// Highest count or goal an admin may set, leaving room for the next count.
pub const MAX_ADMIN_VALUE: u64 = COUNT_LIMIT - 1;

/// What an incoming message means for a counting channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountOutcome {
    /// The message carried the next number and has been counted.
    Accepted {
        count: u64,
        /// The count just reached the channel's goal.
        completed: bool,
        /// The new count should be written to the database.
        persist: bool,
    },
    /// The message did not start with the expected number.
    WrongNumber { expected: u64 },
    /// Strict mode is on and the author posted the previous accepted count.
    ConsecutivePost,
    /// The channel has reached its goal; messages are ignored.
    Completed,
}

/// Extracts the number a counting message starts with.
///
/// The message must begin with a decimal literal, optionally followed by whitespace
/// and any trailing text. Literals with leading zeros and values that overflow `u64`
/// are not numbers for counting purposes.
///
/// # Arguments
/// - `text` - Raw message content
///
/// # Returns
/// - `Some(u64)` - The leading number
/// - `None` - The message does not start with a valid number
pub fn parse_leading_integer(text: &str) -> Option<u64> {
    let captures = LEADING_INTEGER_RE.captures(text)?;

    captures.get(1)?.as_str().parse::<u64>().ok()
}

/// Whether an edit changed the number a message starts with.
///
/// A message without a leading number compares as 0, so editing a number into or out
/// of a message counts as a change.
pub fn edit_changes_number(before: &str, after: &str) -> bool {
    parse_leading_integer(before).unwrap_or(0) != parse_leading_integer(after).unwrap_or(0)
}

impl CountingChannelState {
    /// Creates the state of a freshly added counting channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number the next accepted message must start with, `None` once the channel
    /// has run out of storable numbers.
    pub fn next_expected(&self) -> Option<u64> {
        self.count
            .checked_add(1)
            .filter(|next| *next <= COUNT_LIMIT)
    }

    /// Whether the channel has reached its goal and stopped counting.
    pub fn is_completed(&self) -> bool {
        self.goal > 0 && self.count >= self.goal
    }

    /// Channel topic describing the next expected number and the goal, if any.
    pub fn topic(&self) -> String {
        let mut topic = match self.next_expected() {
            Some(next) => format!("Next message must start with {}", next),
            None => "This channel has run out of numbers".to_string(),
        };

        if self.goal > 0 {
            topic.push_str(&format!(" | Reach {} to complete.", self.goal));
        }

        topic
    }

    /// Evaluates a message posted in the channel.
    ///
    /// Only an `Accepted` outcome changes the state: the count moves up by exactly one
    /// and the author becomes the last author.
    ///
    /// # Arguments
    /// - `author_id` - Discord ID of the message author
    /// - `content` - Message content
    ///
    /// # Returns
    /// - `CountOutcome` - Decision the caller applies to Discord
    pub fn evaluate(&mut self, author_id: u64, content: &str) -> CountOutcome {
        if self.strict && self.last_author_id == Some(author_id) {
            return CountOutcome::ConsecutivePost;
        }

        if self.is_completed() {
            return CountOutcome::Completed;
        }

        let Some(expected) = self.next_expected() else {
            return CountOutcome::Completed;
        };
        if parse_leading_integer(content) != Some(expected) {
            return CountOutcome::WrongNumber { expected };
        }

        self.count = expected;
        self.last_author_id = Some(author_id);

        // A completed count is always stored.
        let completed = self.goal > 0 && expected == self.goal;

        CountOutcome::Accepted {
            count: expected,
            completed,
            persist: completed || expected % PERSIST_INTERVAL == 0,
        }
    }

    /// Overwrites the count, forgetting the last author.
    pub fn set_count(&mut self, count: u64) {
        self.count = count;
        self.last_author_id = None;
    }

    /// Flips strict mode and returns the new value.
    pub fn toggle_strict(&mut self) -> bool {
        self.strict = !self.strict;
        self.strict
    }
}
