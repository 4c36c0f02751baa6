//! Object store trait.

use super::codec::PublicUrlCodec;
use super::model::UploadFile;
use super::progress::UploadProgress;
use crate::error::Result;
use async_trait::async_trait;

/// Binary object storage for media assets.
///
/// Objects live in named buckets and are addressed by a path inside the
/// bucket. Public URLs are derived from the path by the store's codec.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads an object, overwriting any object at the same path.
    ///
    /// Implementations call `progress.report` as bytes are transferred and
    /// must not call `progress.complete`; the caller does that once the
    /// upload is confirmed.
    async fn put_object(
        &self,
        bucket: &str,
        path: &str,
        file: &UploadFile,
        progress: &UploadProgress,
    ) -> Result<()>;

    /// Deletes an object. Deleting a missing object is not an error.
    async fn delete_object(&self, bucket: &str, path: &str) -> Result<()>;

    /// Codec used to derive and invert public URLs.
    fn url_codec(&self) -> &PublicUrlCodec;
}
