//! Identity lookups against the auth endpoint.

use super::client::RestClient;
use async_trait::async_trait;
use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::identity::{Identity, IdentityProvider};
use reqwest::Method;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Resolves access tokens with `GET /auth/v1/user`.
///
/// Every call goes to the server, so an expired session is noticed
/// immediately.
pub struct RestIdentityProvider {
    client: RestClient,
}

impl RestIdentityProvider {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn current_identity(&self, access_token: &str) -> Result<Identity> {
        let url = self.client.endpoint(&["auth", "v1", "user"])?;
        let response = self
            .client
            .send(self.client.user_request(Method::GET, url, access_token))
            .await?;
        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| ReelhubError::io(format!("invalid auth response: {e}")))?;
        into_identity(user)
    }
}

fn into_identity(user: AuthUser) -> Result<Identity> {
    if user.id.trim().is_empty() {
        return Err(ReelhubError::unauthenticated("auth response has no user id"));
    }
    Ok(Identity {
        owner_id: user.id,
        email: user.email,
    })
}
