//! In-memory counting state shared by every event handler task.
//!
//! All counting decisions are made while holding the store's lock so that two
//! messages racing on the same channel are evaluated one after the other. Network
//! calls happen after the lock is released.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::model::counting::{CountingChannel, CountingChannelState, GuildCountingConfig};

/// Number of recent messages remembered per counting channel.
const LEDGER_CAPACITY: usize = 200;

/// Authors whose next deleted message was removed by the bot itself.
///
/// Arming is idempotent: an author is shielded from at most one moderation no
/// matter how many times they were armed before the delete event arrived.
#[derive(Debug, Default)]
pub struct ShieldSet {
    authors: HashSet<u64>,
}

impl ShieldSet {
    /// Shields the author from moderation for their next deleted message.
    pub fn arm(&mut self, author_id: u64) {
        self.authors.insert(author_id);
    }

    /// Consumes the author's shield.
    ///
    /// # Returns
    /// - `true` - The author was shielded; the shield is now spent
    /// - `false` - The author was not shielded
    pub fn consume(&mut self, author_id: u64) -> bool {
        self.authors.remove(&author_id)
    }
}

/// A message seen in a counting channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub message_id: u64,
    pub author_id: u64,
    pub content: String,
}

/// Recent messages per counting channel, used to recover the author and the
/// original content of edited or deleted messages.
#[derive(Debug, Default)]
pub struct MessageLedger {
    channels: HashMap<u64, VecDeque<LedgerEntry>>,
}

impl MessageLedger {
    /// Records a message, evicting the oldest one when the channel is full.
    pub fn record(&mut self, channel_id: u64, entry: LedgerEntry) {
        let entries = self.channels.entry(channel_id).or_default();

        if entries.len() >= LEDGER_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Looks up a recorded message.
    pub fn get(&self, channel_id: u64, message_id: u64) -> Option<&LedgerEntry> {
        self.channels
            .get(&channel_id)?
            .iter()
            .find(|entry| entry.message_id == message_id)
    }

    /// Replaces the remembered content of a message after an allowed edit.
    pub fn update_content(&mut self, channel_id: u64, message_id: u64, content: String) {
        if let Some(entry) = self
            .channels
            .get_mut(&channel_id)
            .and_then(|entries| entries.iter_mut().find(|entry| entry.message_id == message_id))
        {
            entry.content = content;
        }
    }

    /// Removes a message from the ledger and returns it.
    pub fn take(&mut self, channel_id: u64, message_id: u64) -> Option<LedgerEntry> {
        let entries = self.channels.get_mut(&channel_id)?;
        let position = entries
            .iter()
            .position(|entry| entry.message_id == message_id)?;

        entries.remove(position)
    }

    /// Drops everything remembered about a channel.
    pub fn clear_channel(&mut self, channel_id: u64) {
        self.channels.remove(&channel_id);
    }
}

/// Everything guarded by the store's lock.
#[derive(Debug, Default)]
pub struct CountingData {
    guilds: HashMap<u64, GuildCountingConfig>,
    pub shields: ShieldSet,
    pub ledger: MessageLedger,
}

impl CountingData {
    /// Whether counting has been initialized for the guild.
    pub fn is_initialized(&self, guild_id: u64) -> bool {
        self.guilds.contains_key(&guild_id)
    }

    /// Initializes counting for the guild.
    ///
    /// # Returns
    /// - `true` - The guild was not initialized before
    /// - `false` - The guild was already initialized
    pub fn init_guild(&mut self, guild_id: u64) -> bool {
        if self.guilds.contains_key(&guild_id) {
            return false;
        }

        self.guilds.insert(guild_id, GuildCountingConfig::default());
        true
    }

    /// Gets a counting channel's state.
    pub fn channel(&self, guild_id: u64, channel_id: u64) -> Option<&CountingChannelState> {
        self.guilds.get(&guild_id)?.channels.get(&channel_id)
    }

    /// Gets a counting channel's state for mutation.
    pub fn channel_mut(
        &mut self,
        guild_id: u64,
        channel_id: u64,
    ) -> Option<&mut CountingChannelState> {
        self.guilds.get_mut(&guild_id)?.channels.get_mut(&channel_id)
    }

    /// Registers a channel in an initialized guild.
    ///
    /// # Returns
    /// - `true` - The channel was registered
    /// - `false` - The guild is not initialized
    pub fn insert_channel(
        &mut self,
        guild_id: u64,
        channel_id: u64,
        state: CountingChannelState,
    ) -> bool {
        match self.guilds.get_mut(&guild_id) {
            Some(guild) => {
                guild.channels.insert(channel_id, state);
                true
            }
            None => false,
        }
    }

    /// Unregisters a channel and forgets its messages.
    pub fn remove_channel(&mut self, guild_id: u64, channel_id: u64) -> Option<CountingChannelState> {
        let removed = self.guilds.get_mut(&guild_id)?.channels.remove(&channel_id);
        if removed.is_some() {
            self.ledger.clear_channel(channel_id);
        }

        removed
    }
}

/// Shared handle to the counting state.
#[derive(Debug, Clone, Default)]
pub struct CountingStore {
    inner: Arc<Mutex<CountingData>>,
}

impl CountingStore {
    /// Builds the store from persisted rows.
    ///
    /// # Arguments
    /// - `guild_ids` - Guilds that have initialized counting
    /// - `channels` - Every persisted counting channel
    ///
    /// # Returns
    /// - `CountingStore` - Store holding one config per guild
    pub fn from_records(guild_ids: Vec<u64>, channels: Vec<CountingChannel>) -> Self {
        let mut data = CountingData::default();

        for guild_id in guild_ids {
            data.init_guild(guild_id);
        }
        for channel in channels {
            data.init_guild(channel.guild_id);
            data.insert_channel(channel.guild_id, channel.channel_id, channel.state);
        }

        Self {
            inner: Arc::new(Mutex::new(data)),
        }
    }

    /// Locks the store for a read-modify-write.
    pub async fn lock(&self) -> MutexGuard<'_, CountingData> {
        self.inner.lock().await
    }
}
