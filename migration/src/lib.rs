pub use sea_orm_migration::prelude::*;

mod m20261017_000001_create_counting_guild_table;
mod m20261017_000002_create_counting_channel_table;
mod m20261017_000003_create_invite_guild_table;
mod m20261017_000004_create_tracked_invite_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261017_000001_create_counting_guild_table::Migration),
            Box::new(m20261017_000002_create_counting_channel_table::Migration),
            Box::new(m20261017_000003_create_invite_guild_table::Migration),
            Box::new(m20261017_000004_create_tracked_invite_table::Migration),
        ]
    }
}
