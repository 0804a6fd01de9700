//! Escalation against members who tamper with counting history.
//!
//! A tampering member is called out, muted in the channel, and after a grace period
//! hidden from the channel entirely. The callout is removed once the member can no
//! longer see the channel.

use std::sync::Arc;
use std::time::Duration;

use serenity::all::{
    ChannelId, CreateMessage, Mentionable, PermissionOverwrite, PermissionOverwriteType,
    Permissions, UserId,
};
use serenity::http::Http;

use crate::error::AppError;

/// Time between muting a member and hiding the channel from them.
pub const ESCALATION_DELAY: Duration = Duration::from_secs(30);

/// Callout posted when a member edits or deletes a counted message.
pub fn callout_text(user_id: UserId) -> String {
    format!(
        "{} You are sneaky, but I saw it :eyes: Seems like you don't want to play by the rules...",
        user_id.mention()
    )
}

/// Builds a member overwrite denying the given permissions.
fn member_deny(user_id: UserId, deny: Permissions) -> PermissionOverwrite {
    PermissionOverwrite {
        allow: Permissions::empty(),
        deny,
        kind: PermissionOverwriteType::Member(user_id),
    }
}

/// Runs the full escalation for a member in a counting channel.
///
/// Blocks for `ESCALATION_DELAY`; callers spawn it onto its own task.
///
/// # Arguments
/// - `http` - Discord HTTP client
/// - `channel_id` - Counting channel the tampering happened in
/// - `user_id` - Member to restrict
///
/// # Returns
/// - `Ok(())` - Member was hidden from the channel
/// - `Err(AppError::DiscordErr)` - Posting the callout or changing permissions failed
pub async fn escalate(
    http: Arc<Http>,
    channel_id: ChannelId,
    user_id: UserId,
) -> Result<(), AppError> {
    let callout = channel_id
        .send_message(&http, CreateMessage::new().content(callout_text(user_id)))
        .await?;

    channel_id
        .create_permission(&http, member_deny(user_id, Permissions::SEND_MESSAGES))
        .await?;

    tracing::info!(
        "Muted {} in counting channel {} for tampering",
        user_id,
        channel_id
    );

    tokio::time::sleep(ESCALATION_DELAY).await;

    channel_id
        .create_permission(&http, member_deny(user_id, Permissions::VIEW_CHANNEL))
        .await?;

    tracing::info!(
        "Hid counting channel {} from {} for tampering",
        channel_id,
        user_id
    );

    if let Err(e) = callout.delete(&http).await {
        tracing::warn!("Failed to delete tampering callout: {:?}", e);
    }

    Ok(())
}

/// Spawns the escalation and logs its failure.
pub fn spawn_escalation(http: Arc<Http>, channel_id: ChannelId, user_id: UserId) {
    tokio::spawn(async move {
        if let Err(e) = escalate(http, channel_id, user_id).await {
            tracing::error!(
                "Failed to restrict {} in counting channel {}: {:?}",
                user_id,
                channel_id,
                e
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callout_mentions_member() {
        assert_eq!(
            callout_text(UserId::new(42)),
            "<@42> You are sneaky, but I saw it :eyes: Seems like you don't want to play by the rules..."
        );
    }

    #[test]
    fn overwrite_targets_member() {
        let overwrite = member_deny(UserId::new(42), Permissions::VIEW_CHANNEL);

        assert_eq!(overwrite.kind, PermissionOverwriteType::Member(UserId::new(42)));
        assert_eq!(overwrite.deny, Permissions::VIEW_CHANNEL);
        assert!(overwrite.allow.is_empty());
    }
}
