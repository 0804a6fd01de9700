//! Discord actions taken by the counting service.

use std::sync::Arc;
use std::time::Duration;

use serenity::all::{
    ChannelId, CreateMessage, EditChannel, MessageId, PermissionOverwrite,
    PermissionOverwriteType, Permissions, RoleId, UserId,
};
use serenity::async_trait;
use serenity::http::Http;

use crate::{
    error::{internal::InternalError, AppError},
    service::counting::moderation,
};

/// Lifetime of the correction posted after a rejected count.
const CORRECTION_TTL: Duration = Duration::from_secs(5);

/// Discord actions the counting service needs.
#[async_trait]
pub trait CountingSurface: Send + Sync {
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), AppError>;

    /// Posts a correction that removes itself after a few seconds.
    async fn post_correction(&self, channel_id: u64, text: String) -> Result<(), AppError>;

    async fn announce(&self, channel_id: u64, text: String) -> Result<(), AppError>;

    async fn set_topic(&self, channel_id: u64, topic: String) -> Result<(), AppError>;

    /// Adds or clears the SEND_MESSAGES deny on the channel's @everyone overwrite.
    async fn set_everyone_send(
        &self,
        guild_id: u64,
        channel_id: u64,
        allowed: bool,
    ) -> Result<(), AppError>;

    /// Starts the tampering escalation against a member in the background.
    fn restrict(&self, channel_id: u64, user_id: u64);
}

/// `CountingSurface` backed by the Discord HTTP API.
pub struct DiscordCountingSurface {
    http: Arc<Http>,
}

impl DiscordCountingSurface {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl CountingSurface for DiscordCountingSurface {
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), AppError> {
        ChannelId::new(channel_id)
            .delete_message(&self.http, MessageId::new(message_id))
            .await?;

        Ok(())
    }

    async fn post_correction(&self, channel_id: u64, text: String) -> Result<(), AppError> {
        let correction = ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().content(text))
            .await?;

        let http = self.http.clone();
        tokio::spawn(async move {
            tokio::time::sleep(CORRECTION_TTL).await;

            if let Err(e) = correction.delete(&http).await {
                tracing::warn!("Failed to delete counting correction: {:?}", e);
            }
        });

        Ok(())
    }

    async fn announce(&self, channel_id: u64, text: String) -> Result<(), AppError> {
        ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().content(text))
            .await?;

        Ok(())
    }

    async fn set_topic(&self, channel_id: u64, topic: String) -> Result<(), AppError> {
        ChannelId::new(channel_id)
            .edit(&self.http, EditChannel::new().topic(topic))
            .await?;

        Ok(())
    }

    /// Leaves the overwrite's other permissions untouched, and creates no overwrite
    /// just to allow sending.
    async fn set_everyone_send(
        &self,
        guild_id: u64,
        channel_id: u64,
        allowed: bool,
    ) -> Result<(), AppError> {
        let channel_id = ChannelId::new(channel_id);
        let channel = channel_id
            .to_channel(&self.http)
            .await?
            .guild()
            .ok_or(InternalError::ChannelNotInGuild(channel_id.get()))?;

        let everyone = PermissionOverwriteType::Role(RoleId::new(guild_id));
        let existing = channel
            .permission_overwrites
            .iter()
            .find(|overwrite| overwrite.kind == everyone);

        let (mut allow, mut deny) = match existing {
            Some(overwrite) => (overwrite.allow, overwrite.deny),
            None if allowed => return Ok(()),
            None => (Permissions::empty(), Permissions::empty()),
        };

        if allowed {
            if !deny.contains(Permissions::SEND_MESSAGES) {
                return Ok(());
            }
            deny.remove(Permissions::SEND_MESSAGES);
        } else {
            allow.remove(Permissions::SEND_MESSAGES);
            deny.insert(Permissions::SEND_MESSAGES);
        }

        channel_id
            .create_permission(
                &self.http,
                PermissionOverwrite {
                    allow,
                    deny,
                    kind: everyone,
                },
            )
            .await?;

        Ok(())
    }

    fn restrict(&self, channel_id: u64, user_id: u64) {
        moderation::spawn_escalation(
            self.http.clone(),
            ChannelId::new(channel_id),
            UserId::new(user_id),
        );
    }
}
