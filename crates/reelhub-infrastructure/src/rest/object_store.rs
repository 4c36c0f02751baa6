//! Object storage over the storage REST API.

use super::client::RestClient;
use async_trait::async_trait;
use futures::Stream;
use reelhub_core::error::Result;
use reelhub_core::media::{ObjectStore, PublicUrlCodec, UploadFile, UploadProgress};
use reqwest::{Body, Method, Url, header};
use serde::Serialize;

/// Size of each chunk handed to the transport; progress moves once per chunk.
const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Serialize)]
struct DeleteBody<'a> {
    prefixes: [&'a str; 1],
}

pub struct RestObjectStore {
    client: RestClient,
    codec: PublicUrlCodec,
}

impl RestObjectStore {
    pub fn new(client: RestClient) -> Result<Self> {
        let codec = PublicUrlCodec::new(client.base_url().as_str())?;
        Ok(Self { client, codec })
    }

    fn object_url(&self, bucket: &str, path: &str) -> Result<Url> {
        let mut segments = vec!["storage", "v1", "object", bucket];
        segments.extend(path.split('/'));
        self.client.endpoint(&segments)
    }
}

/// Splits `bytes` into chunks that report progress as the transport pulls
/// them.
pub(crate) fn progress_stream(
    bytes: Vec<u8>,
    progress: UploadProgress,
) -> impl Stream<Item = std::io::Result<Vec<u8>>> + Send + 'static {
    let total = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    let mut sent = 0u64;
    futures::stream::iter(chunks.into_iter().map(move |chunk| {
        sent += chunk.len() as u64;
        progress.report(sent, total);
        Ok(chunk)
    }))
}

#[async_trait]
impl ObjectStore for RestObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        path: &str,
        file: &UploadFile,
        progress: &UploadProgress,
    ) -> Result<()> {
        let url = self.object_url(bucket, path)?;
        let content_type = file
            .content_type
            .clone()
            .unwrap_or_else(|| mime_guess::from_path(&file.file_name).first_or_octet_stream().to_string());

        let body = Body::wrap_stream(progress_stream(file.bytes.clone(), progress.clone()));
        let request = self
            .client
            .service_request(Method::POST, url)
            .header("x-upsert", "true")
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, file.size())
            .body(body);

        self.client.send(request).await?;
        tracing::debug!("[RestObjectStore] Stored {}/{}", bucket, path);
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, path: &str) -> Result<()> {
        let url = self.client.endpoint(&["storage", "v1", "object", bucket])?;
        let request = self
            .client
            .service_request(Method::DELETE, url)
            .json(&DeleteBody { prefixes: [path] });

        self.client.send(request).await?;
        tracing::debug!("[RestObjectStore] Deleted {}/{}", bucket, path);
        Ok(())
    }

    fn url_codec(&self) -> &PublicUrlCodec {
        &self.codec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use reelhub_core::config::BackendConfig;

    fn store() -> RestObjectStore {
        let config = BackendConfig {
            project_url: "https://project.example.co".to_string(),
            api_key: "anon".to_string(),
            ..BackendConfig::default()
        };
        RestObjectStore::new(RestClient::new(&config).unwrap()).unwrap()
    }

    #[test]
    fn test_object_url_keeps_folder_separators() {
        let url = store()
            .object_url("avatars", "avatars/owner-1-1700000000000-me.png")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://project.example.co/storage/v1/object/avatars/avatars/owner-1-1700000000000-me.png"
        );
    }

    #[test]
    fn test_codec_uses_project_url() {
        let store = store();
        let url = store.url_codec().public_url(
            reelhub_core::media::AssetKind::Banner,
            "banners/owner-1-1-b.png",
        );
        assert_eq!(
            url,
            "https://project.example.co/storage/v1/object/public/banners/banners/owner-1-1-b.png"
        );
    }

    #[tokio::test]
    async fn test_progress_stream_reports_per_chunk() {
        let progress = UploadProgress::new();
        let receiver = progress.subscribe();
        let bytes = vec![0u8; CHUNK_SIZE * 2 + 10];

        let chunks: Vec<_> = progress_stream(bytes, progress.clone()).collect().await;

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].as_ref().unwrap().len(), 10);
        // Held below 100 until the store confirms.
        assert_eq!(*receiver.borrow(), 99);
    }
}
