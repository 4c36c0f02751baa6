//! Profile upsert coordinator.
//!
//! Drives one submission through identity check, validation, moderation,
//! asset replacement and the final upsert. Only one submission per owner runs
//! at a time.

use crate::auth::authenticate;
use crate::media_replacement::{MediaReplacementManager, UploadedAsset};
use crate::owner_lock::OwnerLocks;
use crate::submission::{ProfileSubmission, SubmissionControl, SubmissionOutcome, SubmissionState};
use crate::validation::{validate_draft, validate_upload};
use chrono::Utc;
use reelhub_core::config::{ConcurrentSubmissionPolicy, RootConfig};
use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::identity::IdentityProvider;
use reelhub_core::media::{AssetKind, ObjectStore, ReplacedAsset, UploadFile};
use reelhub_core::moderation::{BannedWordRepository, ContentPolicyFilter};
use reelhub_core::profile::{ProfileChanges, ProfileDraft, ProfileField, ProfileRepository, WordLimits};
use std::sync::Arc;

/// Orchestrates profile submissions.
///
/// Construct once and share; all state specific to a submission lives in the
/// [`ProfileSubmission`] passed to [`ProfileUpsertCoordinator::submit_profile`].
pub struct ProfileUpsertCoordinator {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
    policy: ContentPolicyFilter,
    media: MediaReplacementManager,
    locks: OwnerLocks,
    limits: WordLimits,
    max_upload_bytes: u64,
    on_concurrent: ConcurrentSubmissionPolicy,
}

impl ProfileUpsertCoordinator {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileRepository>,
        banned_words: Arc<dyn BannedWordRepository>,
        object_store: Arc<dyn ObjectStore>,
    ) -> Self {
        let defaults = RootConfig::default();
        Self {
            identity,
            profiles,
            policy: ContentPolicyFilter::new(banned_words),
            media: MediaReplacementManager::new(object_store),
            locks: OwnerLocks::new(),
            limits: defaults.limits,
            max_upload_bytes: defaults.uploads.max_bytes,
            on_concurrent: defaults.submissions.on_concurrent,
        }
    }

    /// Applies word limits, upload size and concurrency policy from `config`.
    pub fn with_config(mut self, config: &RootConfig) -> Self {
        self.limits = config.limits;
        self.max_upload_bytes = config.uploads.max_bytes;
        self.on_concurrent = config.submissions.on_concurrent;
        self
    }

    pub fn limits(&self) -> &WordLimits {
        &self.limits
    }

    /// Runs `submission` to completion.
    ///
    /// Previous assets are deleted only after the profile references their
    /// replacements.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if the token is blank, invalid, or belongs to a
    ///   different owner
    /// - `SubmissionInProgress` if another submission for the owner is
    ///   running and the policy is `reject`
    /// - `ValidationRejected` / `PolicyViolation` (state `Rejected`); nothing
    ///   is uploaded or written
    /// - `PolicyUnavailable` if the banned-word list cannot be read
    /// - `UploadFailed` if an asset transfer fails; a sibling asset that did
    ///   upload is still recorded on the profile
    /// - `PersistenceFailed` if the profile row cannot be read or written
    /// - `SubmissionAbandoned` if the caller abandoned the submission before
    ///   `Persisting`; new uploads are discarded and previous assets kept
    pub async fn submit_profile(&self, submission: ProfileSubmission) -> Result<SubmissionOutcome> {
        let control = submission.control.clone();
        let result = self.run(submission, &control).await;

        let terminal = match &result {
            Ok(_) => SubmissionState::Done,
            Err(ReelhubError::ValidationRejected { .. } | ReelhubError::PolicyViolation { .. }) => {
                SubmissionState::Rejected
            }
            Err(ReelhubError::SubmissionAbandoned) => SubmissionState::Abandoned,
            Err(_) => SubmissionState::Failed,
        };
        control.transition(terminal);

        match &result {
            Ok(outcome) => tracing::info!(
                "[ProfileUpsert] Saved profile {} ({} asset(s) replaced, {} warning(s))",
                outcome.profile.id,
                outcome.replaced_assets.len(),
                outcome.warnings.len()
            ),
            Err(e) => tracing::info!("[ProfileUpsert] Submission ended in {}: {}", terminal, e),
        }
        result
    }

    async fn run(
        &self,
        submission: ProfileSubmission,
        control: &SubmissionControl,
    ) -> Result<SubmissionOutcome> {
        let ProfileSubmission {
            owner_id,
            access_token,
            mut draft,
            avatar,
            banner,
            ..
        } = submission;

        let identity = authenticate(self.identity.as_ref(), &access_token).await?;
        if identity.owner_id != owner_id {
            tracing::warn!(
                "[ProfileUpsert] Token of {} used to edit profile {}",
                identity.owner_id,
                owner_id
            );
            return Err(ReelhubError::unauthenticated(
                "access token does not belong to this profile",
            ));
        }

        let _guard = self.locks.acquire(&owner_id, self.on_concurrent).await?;
        ensure_current(control)?;

        control.transition(SubmissionState::Validating);
        self.validate(&mut draft, avatar.as_ref(), banner.as_ref())
            .await?;

        let mut uploaded = Vec::new();
        if avatar.is_some() || banner.is_some() {
            ensure_current(control)?;
            control.transition(SubmissionState::Uploading);
            uploaded = self
                .upload_assets(&owner_id, avatar.as_ref(), banner.as_ref(), control)
                .await?;
        }

        if control.cancel.is_cancelled() {
            self.discard_uploads(&uploaded).await;
            return Err(ReelhubError::SubmissionAbandoned);
        }

        control.transition(SubmissionState::Persisting);
        let mut changes = ProfileChanges::from_draft(draft, Utc::now());
        attach_assets(&mut changes, &uploaded);

        let profile = match self.profiles.upsert_profile(&owner_id, &changes).await {
            Ok(profile) => profile,
            Err(e) => {
                log_orphans(&owner_id, &uploaded, "profile write failed");
                return Err(persistence_error(e));
            }
        };

        let replaced = self.retire_previous(uploaded).await;
        let warnings = replaced
            .iter()
            .flat_map(|asset| asset.warnings.iter().cloned())
            .collect();
        Ok(SubmissionOutcome {
            profile,
            replaced_assets: replaced,
            warnings,
        })
    }

    /// Validates, clamps and moderates the draft in place.
    async fn validate(
        &self,
        draft: &mut ProfileDraft,
        avatar: Option<&UploadFile>,
        banner: Option<&UploadFile>,
    ) -> Result<()> {
        validate_draft(draft, Utc::now().date_naive())?;
        if let Some(file) = avatar {
            validate_upload(AssetKind::Avatar, file, self.max_upload_bytes)?;
        }
        if let Some(file) = banner {
            validate_upload(AssetKind::Banner, file, self.max_upload_bytes)?;
        }

        self.limits.clamp_draft(draft);

        let fields: Vec<(ProfileField, &str)> = ProfileField::ALL
            .into_iter()
            .filter_map(|field| draft.text(field).map(|text| (field, text)))
            .collect();
        if fields.is_empty() {
            return Ok(());
        }

        let violations = self.policy.check_fields(&fields).await?;
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ReelhubError::PolicyViolation { violations })
        }
    }

    /// Uploads the changed assets concurrently.
    ///
    /// Previous assets are left in place. When the submission is abandoned
    /// the new objects are discarded. When one upload fails and its sibling
    /// succeeded, the sibling's URL is written on its own and its previous
    /// asset retired before the failure is returned.
    async fn upload_assets(
        &self,
        owner_id: &str,
        avatar: Option<&UploadFile>,
        banner: Option<&UploadFile>,
        control: &SubmissionControl,
    ) -> Result<Vec<UploadedAsset>> {
        let current = self
            .profiles
            .get_profile(owner_id)
            .await
            .map_err(persistence_error)?;
        let previous_avatar = current.as_ref().and_then(|p| p.avatar_url.clone());
        let previous_banner = current.as_ref().and_then(|p| p.banner_url.clone());

        let (avatar_result, banner_result) = tokio::join!(
            self.upload_one(owner_id, AssetKind::Avatar, avatar, previous_avatar.as_deref(), control),
            self.upload_one(owner_id, AssetKind::Banner, banner, previous_banner.as_deref(), control),
        );

        let mut uploaded = Vec::new();
        let mut first_error = None;
        for result in [avatar_result, banner_result] {
            match result {
                Ok(Some(asset)) => uploaded.push(asset),
                Ok(None) => {}
                Err(e) => {
                    // Abandonment outranks an upload failure.
                    if first_error.is_none() || matches!(e, ReelhubError::SubmissionAbandoned) {
                        first_error = Some(e);
                    }
                }
            }
        }

        let Some(error) = first_error else {
            return Ok(uploaded);
        };

        if matches!(error, ReelhubError::SubmissionAbandoned) || control.cancel.is_cancelled() {
            self.discard_uploads(&uploaded).await;
            return Err(ReelhubError::SubmissionAbandoned);
        }

        if !uploaded.is_empty() {
            self.persist_surviving_assets(owner_id, uploaded).await;
        }
        Err(error)
    }

    async fn upload_one(
        &self,
        owner_id: &str,
        kind: AssetKind,
        file: Option<&UploadFile>,
        previous_url: Option<&str>,
        control: &SubmissionControl,
    ) -> Result<Option<UploadedAsset>> {
        let Some(file) = file else {
            return Ok(None);
        };
        self.media
            .upload_asset(
                owner_id,
                kind,
                file,
                previous_url,
                control.progress(kind),
                &control.cancel,
            )
            .await
            .map(Some)
    }

    async fn persist_surviving_assets(&self, owner_id: &str, uploaded: Vec<UploadedAsset>) {
        let mut changes = ProfileChanges::assets_only(Utc::now());
        attach_assets(&mut changes, &uploaded);
        match self.profiles.upsert_profile(owner_id, &changes).await {
            Ok(_) => {
                tracing::info!(
                    "[ProfileUpsert] Recorded {} uploaded asset(s) despite sibling failure",
                    uploaded.len()
                );
                self.retire_previous(uploaded).await;
            }
            Err(e) => {
                tracing::warn!("[ProfileUpsert] Failed to record surviving assets: {}", e);
                log_orphans(owner_id, &uploaded, "profile write failed");
            }
        }
    }

    /// Deletes the assets superseded by recorded uploads.
    async fn retire_previous(&self, uploaded: Vec<UploadedAsset>) -> Vec<ReplacedAsset> {
        let mut replaced = Vec::with_capacity(uploaded.len());
        for asset in uploaded {
            replaced.push(self.media.retire_previous(asset).await);
        }
        replaced
    }

    async fn discard_uploads(&self, uploaded: &[UploadedAsset]) {
        for asset in uploaded {
            tracing::info!(
                "[ProfileUpsert] Discarding {} upload {} of abandoned submission",
                asset.kind,
                asset.storage_path
            );
            self.media.discard(asset).await;
        }
    }
}

fn ensure_current(control: &SubmissionControl) -> Result<()> {
    if control.cancel.is_cancelled() {
        Err(ReelhubError::SubmissionAbandoned)
    } else {
        Ok(())
    }
}

fn attach_assets(changes: &mut ProfileChanges, uploaded: &[UploadedAsset]) {
    for asset in uploaded {
        match asset.kind {
            AssetKind::Avatar => changes.avatar_url = Some(asset.public_url.clone()),
            AssetKind::Banner => changes.banner_url = Some(asset.public_url.clone()),
        }
    }
}

fn persistence_error(e: ReelhubError) -> ReelhubError {
    match e {
        ReelhubError::PersistenceFailed { .. } | ReelhubError::Unauthenticated { .. } => e,
        other => ReelhubError::persistence(other.to_string()),
    }
}

/// Uploaded objects that no profile references. Their paths start with the
/// owner id, so a sweep can find them later.
fn log_orphans(owner_id: &str, uploaded: &[UploadedAsset], reason: &str) {
    for asset in uploaded {
        tracing::warn!(
            "[ProfileUpsert] Orphaned {} of {} at {}/{} ({})",
            asset.kind,
            owner_id,
            asset.kind.bucket(),
            asset.storage_path,
            reason
        );
    }
}

#[cfg(test)]
#[path = "profile_upsert_test.rs"]
mod tests;
