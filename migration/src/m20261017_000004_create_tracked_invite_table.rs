use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TrackedInvite::Table)
                    .if_not_exists()
                    .col(pk_auto(TrackedInvite::Id))
                    .col(string(TrackedInvite::GuildId))
                    .col(string(TrackedInvite::Code))
                    .col(big_integer(TrackedInvite::Uses).default(0))
                    .col(string_null(TrackedInvite::RoleId))
                    .to_owned(),
            )
            .await?;

        // One snapshot row per invite code within a guild
        manager
            .create_index(
                Index::create()
                    .name("idx_tracked_invite_guild_code")
                    .table(TrackedInvite::Table)
                    .col(TrackedInvite::GuildId)
                    .col(TrackedInvite::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_tracked_invite_guild_code")
                    .table(TrackedInvite::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(TrackedInvite::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TrackedInvite {
    Table,
    Id,
    GuildId,
    Code,
    Uses,
    RoleId,
}
