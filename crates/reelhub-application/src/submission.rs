//! A single profile submission and the handle used to observe it.

use reelhub_core::media::{AssetKind, ReplacedAsset, UploadFile, UploadProgress};
use reelhub_core::profile::{Profile, ProfileDraft};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum::{Display, EnumString};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Where a submission currently is.
///
/// `Editing -> Validating -> (Rejected | Uploading) -> Persisting -> Done`.
/// `Uploading` is skipped when no file changed. `Failed` and `Abandoned` end a
/// submission from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubmissionState {
    Editing,
    Validating,
    Rejected,
    Uploading,
    Persisting,
    Done,
    Failed,
    Abandoned,
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Rejected
                | SubmissionState::Done
                | SubmissionState::Failed
                | SubmissionState::Abandoned
        )
    }
}

/// Shared between the coordinator and any monitors.
#[derive(Clone)]
pub(crate) struct SubmissionControl {
    state: Arc<watch::Sender<SubmissionState>>,
    pub(crate) avatar_progress: UploadProgress,
    pub(crate) banner_progress: UploadProgress,
    pub(crate) cancel: CancellationToken,
}

impl SubmissionControl {
    fn new() -> Self {
        let (state, _) = watch::channel(SubmissionState::Editing);
        Self {
            state: Arc::new(state),
            avatar_progress: UploadProgress::new(),
            banner_progress: UploadProgress::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub(crate) fn state(&self) -> SubmissionState {
        *self.state.borrow()
    }

    pub(crate) fn transition(&self, next: SubmissionState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            tracing::debug!("[ProfileUpsert] {} -> {}", previous, next);
        }
    }

    pub(crate) fn progress(&self, kind: AssetKind) -> &UploadProgress {
        match kind {
            AssetKind::Avatar => &self.avatar_progress,
            AssetKind::Banner => &self.banner_progress,
        }
    }
}

/// A profile edit submitted on behalf of the holder of `access_token`.
///
/// The owner id is explicit: the coordinator checks it against the identity
/// resolved from the token instead of reading any ambient session.
pub struct ProfileSubmission {
    pub owner_id: String,
    pub access_token: String,
    pub draft: ProfileDraft,
    pub avatar: Option<UploadFile>,
    pub banner: Option<UploadFile>,
    pub(crate) control: SubmissionControl,
}

impl ProfileSubmission {
    pub fn new(
        owner_id: impl Into<String>,
        access_token: impl Into<String>,
        draft: ProfileDraft,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            access_token: access_token.into(),
            draft,
            avatar: None,
            banner: None,
            control: SubmissionControl::new(),
        }
    }

    pub fn with_avatar(mut self, file: UploadFile) -> Self {
        self.avatar = Some(file);
        self
    }

    pub fn with_banner(mut self, file: UploadFile) -> Self {
        self.banner = Some(file);
        self
    }

    /// The changed file of `kind`, if any.
    pub fn file(&self, kind: AssetKind) -> Option<&UploadFile> {
        match kind {
            AssetKind::Avatar => self.avatar.as_ref(),
            AssetKind::Banner => self.banner.as_ref(),
        }
    }

    /// Returns a handle that follows this submission after it is handed to
    /// the coordinator.
    pub fn monitor(&self) -> SubmissionMonitor {
        SubmissionMonitor {
            control: self.control.clone(),
        }
    }
}

/// Read side of a running submission, plus the ability to abandon it.
#[derive(Clone)]
pub struct SubmissionMonitor {
    control: SubmissionControl,
}

impl SubmissionMonitor {
    pub fn state(&self) -> SubmissionState {
        self.control.state()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SubmissionState> {
        self.control.state.subscribe()
    }

    /// Percentage updates for the avatar upload.
    pub fn avatar_progress(&self) -> watch::Receiver<u8> {
        self.control.avatar_progress.subscribe()
    }

    /// Percentage updates for the banner upload.
    pub fn banner_progress(&self) -> watch::Receiver<u8> {
        self.control.banner_progress.subscribe()
    }

    /// Abandons the submission.
    ///
    /// In-flight uploads are aborted and the profile is not written. Has no
    /// effect once the submission reached `Persisting`.
    pub fn abandon(&self) {
        tracing::info!("[ProfileUpsert] Submission abandoned by caller");
        self.control.cancel.cancel();
    }

    pub fn is_abandoned(&self) -> bool {
        self.control.cancel.is_cancelled()
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub profile: Profile,
    pub replaced_assets: Vec<ReplacedAsset>,
    /// Soft warnings, such as a previous asset that could not be deleted
    pub warnings: Vec<String>,
}
