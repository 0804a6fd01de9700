//! Database repository layer for all persisted settings.
//!
//! This module contains repository structs that handle database operations (CRUD) for each
//! plugin's settings. Repositories use SeaORM entity models internally and return domain
//! models to keep string-encoded IDs and entity types out of the service layer.

pub mod counting;
pub mod invite;

#[cfg(test)]
mod test;
