//! Bot state shared across all event handler tasks.
//!
//! Every field is cheap to clone:
//! - `DatabaseConnection` is a connection pool (clones share the pool)
//! - `CountingStore` and `BulkRoleJob` wrap their state in an `Arc`

use sea_orm::DatabaseConnection;

use crate::service::{bulk_role::job::BulkRoleJob, counting::store::CountingStore};

#[derive(Clone)]
pub struct BotState {
    /// Database connection pool for settings persistence.
    pub db: DatabaseConnection,
    /// In-memory counting state, loaded at startup.
    pub counting: CountingStore,
    /// Process-wide bulk role job slot.
    pub bulk_role: BulkRoleJob,
    /// Text command prefix.
    pub prefix: String,
}

impl BotState {
    pub fn new(db: DatabaseConnection, counting: CountingStore, prefix: String) -> Self {
        Self {
            db,
            counting,
            bulk_role: BulkRoleJob::default(),
            prefix,
        }
    }
}
