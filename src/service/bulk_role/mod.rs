//! Bulk role operator.
//!
//! Applies a role change to every member of a guild while reporting progress in the
//! channel the command was issued from. Discord access goes through the
//! `BulkRoleSurface` trait so the run loop can be exercised without a gateway.

pub mod job;

use std::sync::Arc;

use serenity::all::{
    ChannelId, CreateMessage, EditMessage, GuildId, MessageId, RoleId, UserId,
};
use serenity::async_trait;
use serenity::http::Http;

use crate::{
    error::AppError,
    model::bulk_role::{BulkRoleRequest, BulkRoleSummary, RoleChange, RosterMember},
    service::bulk_role::job::BulkRoleJob,
};

/// Progress message is refreshed every this many members.
const PROGRESS_INTERVAL: usize = 10;

/// Members fetched per roster page.
const ROSTER_PAGE_SIZE: u64 = 1000;

const AUDIT_REASON: &str = "Bulk role operation";

/// Discord actions a bulk role run needs.
#[async_trait]
pub trait BulkRoleSurface: Send + Sync {
    /// Posts a message in the command channel and returns its ID.
    async fn post(&self, text: String) -> Result<u64, AppError>;

    async fn edit(&self, message_id: u64, text: String) -> Result<(), AppError>;

    async fn delete(&self, message_id: u64) -> Result<(), AppError>;

    async fn grant(&self, user_id: u64, role_id: u64) -> Result<(), AppError>;

    async fn revoke(&self, user_id: u64, role_id: u64) -> Result<(), AppError>;
}

/// `BulkRoleSurface` backed by the Discord HTTP API.
pub struct DiscordBulkRoleSurface {
    http: Arc<Http>,
    guild_id: GuildId,
    channel_id: ChannelId,
}

impl DiscordBulkRoleSurface {
    pub fn new(http: Arc<Http>, guild_id: GuildId, channel_id: ChannelId) -> Self {
        Self {
            http,
            guild_id,
            channel_id,
        }
    }

    /// Fetches the full member roster page by page.
    ///
    /// # Returns
    /// - `Ok(Vec<RosterMember>)` - Every member with their role IDs
    /// - `Err(AppError::DiscordErr)` - A page request failed
    pub async fn fetch_roster(&self) -> Result<Vec<RosterMember>, AppError> {
        let mut roster = Vec::new();
        let mut after: Option<UserId> = None;

        loop {
            let page = self
                .guild_id
                .members(&self.http, Some(ROSTER_PAGE_SIZE), after)
                .await?;
            let page_len = page.len();

            after = page.last().map(|member| member.user.id);
            roster.extend(page.into_iter().map(|member| RosterMember {
                user_id: member.user.id.get(),
                role_ids: member.roles.iter().map(|role| role.get()).collect(),
            }));

            if (page_len as u64) < ROSTER_PAGE_SIZE {
                break;
            }
        }

        tracing::debug!(
            "Fetched {} members of guild {} for bulk role run",
            roster.len(),
            self.guild_id
        );

        Ok(roster)
    }
}

#[async_trait]
impl BulkRoleSurface for DiscordBulkRoleSurface {
    async fn post(&self, text: String) -> Result<u64, AppError> {
        let message = self
            .channel_id
            .send_message(&self.http, CreateMessage::new().content(text))
            .await?;

        Ok(message.id.get())
    }

    async fn edit(&self, message_id: u64, text: String) -> Result<(), AppError> {
        self.channel_id
            .edit_message(
                &self.http,
                MessageId::new(message_id),
                EditMessage::new().content(text),
            )
            .await?;

        Ok(())
    }

    async fn delete(&self, message_id: u64) -> Result<(), AppError> {
        self.channel_id
            .delete_message(&self.http, MessageId::new(message_id))
            .await?;

        Ok(())
    }

    async fn grant(&self, user_id: u64, role_id: u64) -> Result<(), AppError> {
        self.http
            .add_member_role(
                self.guild_id,
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(AUDIT_REASON),
            )
            .await?;

        Ok(())
    }

    async fn revoke(&self, user_id: u64, role_id: u64) -> Result<(), AppError> {
        self.http
            .remove_member_role(
                self.guild_id,
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(AUDIT_REASON),
            )
            .await?;

        Ok(())
    }
}

/// Runs a bulk role job over a roster and releases the job slot when done.
///
/// The caller must have claimed the slot with `BulkRoleJob::try_start`. Cancellation
/// is checked before each member. Per-member failures are logged and the member still
/// counts as processed.
///
/// # Arguments
/// - `surface` - Discord actions for the guild and command channel
/// - `job` - Claimed job slot
/// - `request` - Validated bulk role request
/// - `roster` - Members to visit
///
/// # Returns
/// - `BulkRoleSummary` - Counts of processed and changed members
pub async fn run(
    surface: &impl BulkRoleSurface,
    job: &BulkRoleJob,
    request: &BulkRoleRequest,
    roster: &[RosterMember],
) -> BulkRoleSummary {
    let total = roster.len();
    let mut summary = BulkRoleSummary {
        processed: 0,
        total,
        changed: 0,
        cancelled: false,
    };

    let mut progress_id = match surface.post(request.progress_text(0, total)).await {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!("Failed to post bulk role progress: {:?}", e);
            None
        }
    };

    for member in roster {
        if job.is_cancel_requested().await {
            summary.cancelled = true;
            break;
        }

        if let Some(change) = request.change_for(member) {
            let result = match change {
                RoleChange::Grant => surface.grant(member.user_id, request.role_id).await,
                RoleChange::Revoke => surface.revoke(member.user_id, request.role_id).await,
            };

            match result {
                Ok(()) => summary.changed += 1,
                Err(e) => tracing::warn!(
                    "Failed to {} role {} for member {}: {:?}",
                    request.operation,
                    request.role_id,
                    member.user_id,
                    e
                ),
            }
        }

        summary.processed += 1;

        if summary.processed % PROGRESS_INTERVAL == 0 {
            progress_id = refresh_progress(
                surface,
                progress_id,
                request.progress_text(summary.processed, total),
            )
            .await;
        }
    }

    if let Some(id) = progress_id {
        if let Err(e) = surface.delete(id).await {
            tracing::warn!("Failed to delete bulk role progress: {:?}", e);
        }
    }

    if let Err(e) = surface.post(request.summary_text(&summary)).await {
        tracing::warn!("Failed to post bulk role summary: {:?}", e);
    }

    tracing::info!(
        "Bulk {} of role {} finished: {}/{} processed, {} changed, cancelled: {}",
        request.operation,
        request.role_id,
        summary.processed,
        summary.total,
        summary.changed,
        summary.cancelled
    );

    job.finish().await;

    summary
}

/// Edits the progress message in place, reposting it if the edit fails.
async fn refresh_progress(
    surface: &impl BulkRoleSurface,
    progress_id: Option<u64>,
    text: String,
) -> Option<u64> {
    if let Some(id) = progress_id {
        match surface.edit(id, text.clone()).await {
            Ok(()) => return Some(id),
            Err(e) => tracing::debug!("Reposting bulk role progress after failed edit: {:?}", e),
        }
    }

    match surface.post(text).await {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!("Failed to repost bulk role progress: {:?}", e);
            None
        }
    }
}
