//! Guild Cogs Test Utils
//!
//! Provides shared testing utilities for the guild cogs bot. This crate offers a builder
//! pattern for creating test contexts with in-memory SQLite databases, factories for
//! inserting settings rows, and factories for Serenity model objects.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Row factories for the counting and invite settings tables
//! - **serenity**: Serenity object factories built from JSON
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::CountingChannel;
//!
//! #[tokio::test]
//! async fn test_counting_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(CountingChannel)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod serenity;
