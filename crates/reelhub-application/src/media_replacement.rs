//! Media replacement: upload a new asset, then retire the one it replaces.

use chrono::Utc;
use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::media::{
    AssetKind, ObjectStore, PublicUrlCodec, ReplacedAsset, UploadFile, UploadProgress,
    storage_path,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A new asset that is stored but has not yet replaced anything.
///
/// The previous asset it supersedes is still in place until
/// [`MediaReplacementManager::retire_previous`] runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub kind: AssetKind,
    pub public_url: String,
    pub storage_path: String,
    /// Storage path of the asset this one supersedes
    pub previous_path: Option<String>,
}

/// Uploads avatar and banner assets and deletes the assets they supersede.
///
/// Replacement happens in two steps: [`upload_asset`] stores the new object,
/// [`retire_previous`] deletes the old one. The coordinator runs the second
/// step only once the new URL is recorded, so an abandoned or failed
/// submission never leaves a profile pointing at a deleted object. Failing
/// to delete the previous asset never fails the replacement.
///
/// [`upload_asset`]: MediaReplacementManager::upload_asset
/// [`retire_previous`]: MediaReplacementManager::retire_previous
#[derive(Clone)]
pub struct MediaReplacementManager {
    store: Arc<dyn ObjectStore>,
}

impl MediaReplacementManager {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Codec of the underlying store.
    pub fn url_codec(&self) -> &PublicUrlCodec {
        self.store.url_codec()
    }

    /// Replaces an asset in one go, without cancellation.
    pub async fn replace_asset(
        &self,
        owner_id: &str,
        kind: AssetKind,
        file: &UploadFile,
        previous_url: Option<&str>,
        progress: &UploadProgress,
    ) -> Result<ReplacedAsset> {
        let uploaded = self
            .upload_asset(
                owner_id,
                kind,
                file,
                previous_url,
                progress,
                &CancellationToken::new(),
            )
            .await?;
        Ok(self.retire_previous(uploaded).await)
    }

    /// Uploads `file` as the new `kind` asset of `owner_id`.
    ///
    /// # Arguments
    ///
    /// * `previous_url` - Public URL of the asset being replaced, if any;
    ///   left untouched here
    /// * `progress` - Reset to 0 on entry, 100 once the store confirms
    /// * `cancel` - Aborts the transfer and discards the new object
    ///
    /// # Errors
    ///
    /// - `UploadFailed` if the store rejects the upload
    /// - `SubmissionAbandoned` if `cancel` fires before the upload is confirmed
    pub async fn upload_asset(
        &self,
        owner_id: &str,
        kind: AssetKind,
        file: &UploadFile,
        previous_url: Option<&str>,
        progress: &UploadProgress,
        cancel: &CancellationToken,
    ) -> Result<UploadedAsset> {
        progress.reset();

        let bucket = kind.bucket();
        let path = storage_path(kind, owner_id, Utc::now().timestamp_millis(), &file.file_name);
        tracing::debug!(
            "[MediaReplacement] Uploading {} for {} to {}/{} ({} bytes)",
            kind,
            owner_id,
            bucket,
            path,
            file.size()
        );

        let upload = self.store.put_object(bucket, &path, file, progress);
        let uploaded = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            result = upload => Some(result),
        };

        match uploaded {
            None => {
                tracing::info!("[MediaReplacement] {} upload cancelled mid-transfer", kind);
                self.discard_object(bucket, &path).await;
                return Err(ReelhubError::SubmissionAbandoned);
            }
            Some(Err(e)) => {
                tracing::warn!("[MediaReplacement] {} upload failed: {}", kind, e);
                return Err(ReelhubError::upload_failed(kind, e.to_string()));
            }
            Some(Ok(())) => {}
        }

        if cancel.is_cancelled() {
            tracing::info!("[MediaReplacement] {} uploaded after cancellation, discarding", kind);
            self.discard_object(bucket, &path).await;
            return Err(ReelhubError::SubmissionAbandoned);
        }

        progress.complete();
        let codec = self.store.url_codec();
        let previous_path = match previous_url.map(|url| codec.resolve_path(kind, url)) {
            Some(Some(old_path)) if old_path != path => Some(old_path),
            Some(None) => {
                tracing::debug!(
                    "[MediaReplacement] Previous {} URL does not resolve to a stored object",
                    kind
                );
                None
            }
            _ => None,
        };

        Ok(UploadedAsset {
            kind,
            public_url: codec.public_url(kind, &path),
            storage_path: path,
            previous_path,
        })
    }

    /// Deletes the asset `uploaded` supersedes, at most once.
    ///
    /// A failed delete is logged and returned as a warning on the result.
    pub async fn retire_previous(&self, uploaded: UploadedAsset) -> ReplacedAsset {
        let UploadedAsset {
            kind,
            public_url,
            storage_path,
            previous_path,
        } = uploaded;
        let mut warnings = Vec::new();

        if let Some(old_path) = previous_path {
            match self.store.delete_object(kind.bucket(), &old_path).await {
                Ok(()) => {
                    tracing::debug!("[MediaReplacement] Deleted previous {} {}", kind, old_path)
                }
                Err(e) => {
                    tracing::warn!(
                        "[MediaReplacement] Failed to delete previous {} {}: {}",
                        kind,
                        old_path,
                        e
                    );
                    warnings.push(format!(
                        "previous {} '{}' could not be deleted: {}",
                        kind, old_path, e
                    ));
                }
            }
        }

        ReplacedAsset {
            kind,
            public_url,
            storage_path,
            warnings,
        }
    }

    /// Removes a new object that will never be referenced. The previous
    /// asset is kept.
    pub async fn discard(&self, uploaded: &UploadedAsset) {
        self.discard_object(uploaded.kind.bucket(), &uploaded.storage_path)
            .await;
    }

    async fn discard_object(&self, bucket: &str, path: &str) {
        match self.store.delete_object(bucket, path).await {
            Ok(()) => tracing::debug!("[MediaReplacement] Discarded {}/{}", bucket, path),
            Err(e) => tracing::warn!(
                "[MediaReplacement] Could not discard unreferenced upload {}/{}: {}",
                bucket,
                path,
                e
            ),
        }
    }
}
