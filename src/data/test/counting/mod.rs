use crate::{
    data::counting::CountingRepository,
    error::{internal::InternalError, AppError},
    model::counting::{CountingChannel, CountingChannelState, UpsertCountingChannelParam},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use test_utils::{builder::TestBuilder, factory};

/// Reads a counting channel row back through the domain conversion.
async fn find_channel(
    db: &DatabaseConnection,
    channel_id: u64,
) -> Result<Option<CountingChannel>, AppError> {
    let entity = entity::prelude::CountingChannel::find()
        .filter(entity::counting_channel::Column::ChannelId.eq(channel_id.to_string()))
        .one(db)
        .await?;

    entity.map(CountingChannel::from_entity).transpose()
}

mod create_guild;
mod delete_channel;
mod get_all;
mod upsert_channel;
