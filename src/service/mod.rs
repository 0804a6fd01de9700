//! Business logic for the bot's three plugins.
//!
//! Services coordinate repositories (data layer) and the Discord API. Each plugin gets
//! its own module; `permission` holds the role hierarchy checks they share.

pub mod bulk_role;
pub mod counting;
pub mod invite;
pub mod permission;
