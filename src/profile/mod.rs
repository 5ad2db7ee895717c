//! User profile documents.
//!
//! This module provides the `ProfileStore` port for the cloud `users`
//! collection and `save_user_profile`, the write-once upsert that runs
//! after a user authenticates. Profile persistence never blocks or fails an
//! auth flow.

pub mod store;
pub mod upsert;

#[cfg(test)]
pub mod testing;

pub use store::{HttpProfileStore, ProfileError, ProfileRecord, ProfileStore};
pub use upsert::{save_user_profile, UserProfile};
