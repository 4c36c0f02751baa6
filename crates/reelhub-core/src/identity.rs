//! Identity provider trait.
//!
//! The identity of the caller is resolved from an explicit access token at
//! the start of every operation; nothing is cached across operations.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable id of the user, also the profile row key
    pub owner_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            email: None,
        }
    }
}

/// Resolves access tokens to identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the identity behind `access_token`.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if the token is missing, invalid or expired
    /// - any other error if the provider itself could not be reached
    async fn current_identity(&self, access_token: &str) -> Result<Identity>;
}
