//! Domain models shared by the data, service and bot layers.
//!
//! Models are plain Rust types with Discord IDs as `u64`. Repositories convert database
//! entities into these types at the data layer boundary via `from_entity`, so nothing
//! above the data layer handles SeaORM models or string-encoded IDs.

pub mod bulk_role;
pub mod counting;
pub mod invite;
