//! Builds the adapter set selected by `backend.kind`.

use crate::local::{FileSystemObjectStore, StaticTokenIdentityProvider, TomlDataStore};
use crate::rest::{
    RestBannedWordRepository, RestClient, RestIdentityProvider, RestObjectStore,
    RestProfileRepository, RestReportRepository,
};
use reelhub_core::config::{BackendKind, RootConfig};
use reelhub_core::error::Result;
use reelhub_core::identity::IdentityProvider;
use reelhub_core::media::ObjectStore;
use reelhub_core::moderation::BannedWordRepository;
use reelhub_core::profile::ProfileRepository;
use reelhub_core::report::ReportRepository;
use std::sync::Arc;

/// Every external service the use cases need.
#[derive(Clone)]
pub struct Backend {
    pub identity: Arc<dyn IdentityProvider>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub banned_words: Arc<dyn BannedWordRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub object_store: Arc<dyn ObjectStore>,
}

impl Backend {
    pub fn from_config(config: &RootConfig) -> Result<Self> {
        match config.backend.kind {
            BackendKind::Rest => Self::rest(config),
            BackendKind::Local => Self::local(config),
        }
    }

    fn rest(config: &RootConfig) -> Result<Self> {
        let client = RestClient::new(&config.backend)?;
        tracing::info!("[Backend] Using hosted backend at {}", client.base_url());
        Ok(Self {
            identity: Arc::new(RestIdentityProvider::new(client.clone())),
            profiles: Arc::new(RestProfileRepository::new(client.clone())),
            banned_words: Arc::new(RestBannedWordRepository::new(client.clone())),
            reports: Arc::new(RestReportRepository::new(client.clone())),
            object_store: Arc::new(RestObjectStore::new(client)?),
        })
    }

    fn local(config: &RootConfig) -> Result<Self> {
        let local = &config.local;
        tracing::info!(
            "[Backend] Using local backend ({}, {})",
            local.data_file.display(),
            local.objects_dir.display()
        );
        let rows = Arc::new(TomlDataStore::new(local.data_file.clone()));
        Ok(Self {
            identity: Arc::new(StaticTokenIdentityProvider::new(local.tokens.clone())),
            profiles: rows.clone(),
            banned_words: rows.clone(),
            reports: rows,
            object_store: Arc::new(FileSystemObjectStore::new(
                local.objects_dir.clone(),
                &local.public_base_url,
            )?),
        })
    }
}
