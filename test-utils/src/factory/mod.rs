//! Factory methods for creating test data.
//!
//! Each factory inserts a row with sensible defaults, reducing boilerplate in tests.
//! Builders allow overriding individual columns; `create_*` functions cover the
//! default case.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     let guild = factory::create_counting_guild(&db).await?;
//!     let channel = factory::counting::CountingChannelFactory::new(&db, &guild.guild_id)
//!         .count(41)
//!         .strict(true)
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Available Factories
//!
//! - `counting` - Counting guild and channel rows
//! - `invite` - Invite guild settings and tracked invite rows
//! - `helpers` - Unique ID generation shared by all factories

pub mod counting;
pub mod helpers;
pub mod invite;

pub use counting::{create_counting_channel, create_counting_guild};
pub use invite::{create_invite_guild, create_tracked_invite};
