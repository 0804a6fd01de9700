use sea_orm::DatabaseConnection;
use serenity::http::Http;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
    data::invite::InviteSettingsRepository, error::AppError, service::invite::InviteService,
};

/// Starts the invite resync scheduler
///
/// Runs every 10 minutes and reconciles the invite snapshot of every guild with
/// invite utilities enabled, so invites created or deleted while no member joined
/// are picked up before the next join.
///
/// # Arguments
/// - `db`: Database connection
/// - `discord_http`: Discord HTTP client for fetching invites
pub async fn start_scheduler(
    db: DatabaseConnection,
    discord_http: Arc<Http>,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_db = db.clone();
    let job_http = discord_http.clone();

    let job = Job::new_async("0 */10 * * * *", move |_uuid, _lock| {
        let db = job_db.clone();
        let http = job_http.clone();

        Box::pin(async move {
            if let Err(e) = sync_all_guilds(&db, http).await {
                tracing::error!("Error resyncing invites: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Invite resync scheduler started");

    Ok(scheduler)
}

/// Reconciles every configured guild; one guild failing does not stop the others
async fn sync_all_guilds(db: &DatabaseConnection, discord_http: Arc<Http>) -> Result<(), AppError> {
    let guilds = InviteSettingsRepository::new(db).get_all().await?;
    let service = InviteService::new(db, discord_http);

    for settings in guilds {
        if let Err(e) = service.sync_guild(settings.guild_id).await {
            tracing::warn!(
                "Failed to resync invites for guild {}: {}",
                settings.guild_id,
                e
            );
        }
    }

    Ok(())
}
