use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InviteGuild::Table)
                    .if_not_exists()
                    .col(pk_auto(InviteGuild::Id))
                    .col(string_uniq(InviteGuild::GuildId))
                    .col(string_null(InviteGuild::ChannelId))
                    .col(boolean(InviteGuild::Embed).default(false))
                    .col(text(InviteGuild::JoinMessage))
                    .col(text(InviteGuild::LeaveMessage))
                    .col(boolean(InviteGuild::JoinEnabled).default(false))
                    .col(boolean(InviteGuild::LeaveEnabled).default(false))
                    .col(string_null(InviteGuild::BotRoleId))
                    .col(boolean(InviteGuild::BotRoleEnabled).default(false))
                    .col(timestamp(InviteGuild::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InviteGuild::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum InviteGuild {
    Table,
    Id,
    GuildId,
    ChannelId,
    Embed,
    JoinMessage,
    LeaveMessage,
    JoinEnabled,
    LeaveEnabled,
    BotRoleId,
    BotRoleEnabled,
    CreatedAt,
}
