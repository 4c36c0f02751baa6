//! Identity provider backed by a fixed token table.

use async_trait::async_trait;
use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::identity::{Identity, IdentityProvider};
use std::collections::HashMap;

/// Maps access tokens to owner ids, as listed under `[local.tokens]`.
pub struct StaticTokenIdentityProvider {
    tokens: HashMap<String, String>,
}

impl StaticTokenIdentityProvider {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenIdentityProvider {
    async fn current_identity(&self, access_token: &str) -> Result<Identity> {
        self.tokens
            .get(access_token)
            .map(Identity::new)
            .ok_or_else(|| ReelhubError::unauthenticated("unknown or expired access token"))
    }
}
