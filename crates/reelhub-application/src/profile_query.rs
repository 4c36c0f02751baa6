//! Profile Query Service
//!
//! Loads the caller's own profile for the edit form, together with the word
//! counters shown next to each bounded field.

use crate::auth::authenticate;
use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::identity::IdentityProvider;
use reelhub_core::profile::{FieldUsage, Profile, ProfileField, ProfileRepository, WordLimits};
use std::sync::Arc;

/// Read side of the profile edit form.
pub struct ProfileQueryService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
    limits: WordLimits,
}

impl ProfileQueryService {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self {
            identity,
            profiles,
            limits: WordLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: WordLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Loads the profile of the holder of `access_token`.
    ///
    /// An owner without a stored row gets an empty profile, so the edit form
    /// can always be pre-filled.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if the token cannot be resolved
    /// - `PersistenceFailed` if the store cannot be read
    pub async fn load_for_edit(&self, access_token: &str) -> Result<Profile> {
        let identity = authenticate(self.identity.as_ref(), access_token).await?;

        match self.profiles.get_profile(&identity.owner_id).await {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) => {
                tracing::debug!(
                    "[ProfileQuery] No profile stored for {}, starting empty",
                    identity.owner_id
                );
                Ok(Profile::empty(identity.owner_id))
            }
            Err(e) => {
                tracing::error!("[ProfileQuery] Failed to load profile: {}", e);
                Err(match e {
                    ReelhubError::PersistenceFailed { .. } => e,
                    other => ReelhubError::persistence(other.to_string()),
                })
            }
        }
    }

    /// Word usage of every bounded field of `profile`.
    pub fn field_usage(&self, profile: &Profile) -> Vec<FieldUsage> {
        ProfileField::ALL
            .into_iter()
            .map(|field| self.limits.usage(field, profile.text(field)))
            .collect()
    }
}
