//! Identity resolution shared by every use case.

use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::identity::{Identity, IdentityProvider};

/// Resolves the caller behind `access_token`.
///
/// A blank token is rejected without asking the provider.
pub(crate) async fn authenticate(
    provider: &dyn IdentityProvider,
    access_token: &str,
) -> Result<Identity> {
    if access_token.trim().is_empty() {
        return Err(ReelhubError::unauthenticated("missing access token"));
    }
    let identity = provider.current_identity(access_token).await.map_err(|e| {
        tracing::warn!("[Auth] Identity lookup failed: {}", e);
        e
    })?;
    tracing::debug!("[Auth] Authenticated owner {}", identity.owner_id);
    Ok(identity)
}
