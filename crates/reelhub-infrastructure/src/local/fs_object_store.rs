//! Directory-backed object store for local development.
//!
//! Objects live at `{root}/{bucket}/{path}`. Public URLs use the same layout
//! as the hosted store, rooted at the configured `public_base_url`.

use async_trait::async_trait;
use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::media::{ObjectStore, PublicUrlCodec, UploadFile, UploadProgress, is_well_formed_path};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const CHUNK_SIZE: usize = 64 * 1024;

pub struct FileSystemObjectStore {
    root_dir: PathBuf,
    codec: PublicUrlCodec,
}

impl FileSystemObjectStore {
    pub fn new(root_dir: PathBuf, public_base_url: &str) -> Result<Self> {
        Ok(Self {
            root_dir,
            codec: PublicUrlCodec::new(public_base_url)?,
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// File backing `bucket/path`. Rejects anything that could leave the
    /// root directory.
    pub fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf> {
        if !is_well_formed_path(bucket) || bucket.contains('/') || !is_well_formed_path(path) {
            return Err(ReelhubError::validation(
                "storage_path",
                format!("'{}/{}' is not a valid object path", bucket, path),
            ));
        }
        let mut file_path = self.root_dir.join(bucket);
        for segment in path.split('/') {
            file_path.push(segment);
        }
        Ok(file_path)
    }
}

#[async_trait]
impl ObjectStore for FileSystemObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        path: &str,
        file: &UploadFile,
        progress: &UploadProgress,
    ) -> Result<()> {
        let target = self.object_path(bucket, path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let part = target.with_extension("part");
        let mut out = fs::File::create(&part).await?;
        let total = file.size();
        let mut written = 0u64;
        for chunk in file.bytes.chunks(CHUNK_SIZE) {
            out.write_all(chunk).await?;
            written += chunk.len() as u64;
            progress.report(written, total);
        }
        out.sync_all().await?;
        drop(out);

        fs::rename(&part, &target).await?;
        tracing::debug!("[FsObjectStore] Wrote {}", target.display());
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, path: &str) -> Result<()> {
        let target = self.object_path(bucket, path)?;
        match fs::remove_file(&target).await {
            Ok(()) => {
                tracing::debug!("[FsObjectStore] Removed {}", target.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("[FsObjectStore] {} already gone", target.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn url_codec(&self) -> &PublicUrlCodec {
        &self.codec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FileSystemObjectStore {
        FileSystemObjectStore::new(dir.path().to_path_buf(), "http://localhost:8080").unwrap()
    }

    #[tokio::test]
    async fn test_put_then_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let progress = UploadProgress::new();
        let file = UploadFile::new("a.png", vec![1u8; CHUNK_SIZE + 1]);

        store
            .put_object("avatars", "avatars/owner-1-1-a.png", &file, &progress)
            .await
            .unwrap();

        let on_disk = temp_dir.path().join("avatars/avatars/owner-1-1-a.png");
        assert_eq!(std::fs::read(&on_disk).unwrap().len(), CHUNK_SIZE + 1);
        assert_eq!(progress.percent(), 99);

        store.delete_object("avatars", "avatars/owner-1-1-a.png").await.unwrap();
        assert!(!on_disk.exists());
        // Deleting twice is not an error.
        store.delete_object("avatars", "avatars/owner-1-1-a.png").await.unwrap();
    }

    #[test]
    fn test_object_path_rejects_escapes() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        assert!(store.object_path("avatars", "../secret").is_err());
        assert!(store.object_path("avatars", "/etc/passwd").is_err());
        assert!(store.object_path("../avatars", "a.png").is_err());
        assert!(store.object_path("avatars", "avatars/ok-1.png").is_ok());
    }
}
