use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CountingChannel::Table)
                    .if_not_exists()
                    .col(pk_auto(CountingChannel::Id))
                    .col(string(CountingChannel::GuildId))
                    .col(string_uniq(CountingChannel::ChannelId))
                    .col(big_integer(CountingChannel::Count).default(0))
                    .col(big_integer(CountingChannel::Goal).default(0))
                    .col(boolean(CountingChannel::Strict).default(false))
                    .col(string_null(CountingChannel::LastAuthorId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_counting_channel_guild_id")
                    .table(CountingChannel::Table)
                    .col(CountingChannel::GuildId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_counting_channel_guild_id")
                    .table(CountingChannel::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CountingChannel::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CountingChannel {
    Table,
    Id,
    GuildId,
    ChannelId,
    Count,
    Goal,
    Strict,
    LastAuthorId,
}
