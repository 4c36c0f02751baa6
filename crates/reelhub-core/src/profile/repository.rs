//! Profile repository trait.
//!
//! Defines the relational-store operations the profile workflow relies on.

use super::model::{Profile, ProfileChanges};
use crate::error::Result;
use async_trait::async_trait;

/// Row access for profiles, keyed by owner id.
///
/// One profile per owner is assumed; implementations do not need to enforce
/// it.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds the profile of an owner.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Profile))`: Profile found
    /// - `Ok(None)`: The owner has never saved a profile
    /// - `Err(_)`: The store could not be queried
    async fn get_profile(&self, owner_id: &str) -> Result<Option<Profile>>;

    /// Inserts or merges a profile row.
    ///
    /// Columns that are `None` in `changes` must keep their stored value.
    /// Returns the row as stored after the write.
    async fn upsert_profile(&self, owner_id: &str, changes: &ProfileChanges) -> Result<Profile>;
}
