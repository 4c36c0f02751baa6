//! Banned-word repository trait.

use crate::error::Result;
use async_trait::async_trait;

/// Read-only access to the externally maintained banned-word list.
#[async_trait]
pub trait BannedWordRepository: Send + Sync {
    /// Fetches the current list of banned terms.
    ///
    /// Called once per moderation check; implementations must not cache
    /// across calls.
    async fn list_banned_words(&self) -> Result<Vec<String>>;
}
