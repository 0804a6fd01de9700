//! Serenity model factories.
//!
//! Objects are built by deserializing the JSON Discord would send, so they are
//! indistinguishable from gateway data for the code under test.

pub mod role;

pub use role::{create_test_role, create_test_roles};
