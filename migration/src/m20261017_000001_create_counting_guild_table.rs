use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CountingGuild::Table)
                    .if_not_exists()
                    .col(pk_auto(CountingGuild::Id))
                    .col(string_uniq(CountingGuild::GuildId))
                    .col(timestamp(CountingGuild::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CountingGuild::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CountingGuild {
    Table,
    Id,
    GuildId,
    CreatedAt,
}
