//! TOML-backed rows for the local development backend.
//!
//! Profiles, banned words and reports share one file:
//!
//! ```toml
//! banned_words = ["badword1"]
//!
//! [profiles.owner-1]
//! id = "owner-1"
//! full_name = "Ada"
//! ...
//!
//! [[reports]]
//! id = "..."
//! ```
//!
//! Every write is a locked read-modify-write through [`AtomicTomlFile`],
//! run on the blocking pool.

use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::moderation::BannedWordRepository;
use reelhub_core::profile::{Profile, ProfileChanges, ProfileRepository};
use reelhub_core::report::{ProfileReport, ReportRepository};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task;

/// Contents of the local data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalData {
    pub banned_words: Vec<String>,
    pub profiles: BTreeMap<String, Profile>,
    pub reports: Vec<ProfileReport>,
}

/// Row store over a single TOML file.
#[derive(Clone)]
pub struct TomlDataStore {
    file: Arc<AtomicTomlFile<LocalData>>,
}

impl TomlDataStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    async fn read<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(LocalData) -> R + Send + 'static,
    {
        let file = self.file.clone();
        task::spawn_blocking(move || file.load().map(f))
            .await
            .map_err(|e| ReelhubError::io(format!("Failed to spawn blocking task: {}", e)))?
    }

    async fn update<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut LocalData) -> Result<R> + Send + 'static,
    {
        let file = self.file.clone();
        task::spawn_blocking(move || file.update(f))
            .await
            .map_err(|e| ReelhubError::io(format!("Failed to spawn blocking task: {}", e)))?
    }

    /// Replaces the banned-word list. Used to seed development data.
    pub async fn set_banned_words(&self, words: Vec<String>) -> Result<()> {
        self.update(move |data| {
            data.banned_words = words;
            Ok(())
        })
        .await
    }

    pub async fn list_reports(&self) -> Result<Vec<ProfileReport>> {
        self.read(|data| data.reports).await
    }
}

#[async_trait]
impl ProfileRepository for TomlDataStore {
    async fn get_profile(&self, owner_id: &str) -> Result<Option<Profile>> {
        let owner_id = owner_id.to_string();
        self.read(move |mut data| data.profiles.remove(&owner_id))
            .await
    }

    async fn upsert_profile(&self, owner_id: &str, changes: &ProfileChanges) -> Result<Profile> {
        let owner_id = owner_id.to_string();
        let changes = changes.clone();
        let profile = self
            .update(move |data| {
                let row = data
                    .profiles
                    .entry(owner_id.clone())
                    .or_insert_with(|| Profile::empty(owner_id));
                changes.apply_to(row);
                Ok(row.clone())
            })
            .await?;
        tracing::debug!("[TomlDataStore] Upserted profile {}", profile.id);
        Ok(profile)
    }
}

#[async_trait]
impl BannedWordRepository for TomlDataStore {
    async fn list_banned_words(&self) -> Result<Vec<String>> {
        self.read(|data| data.banned_words).await
    }
}

#[async_trait]
impl ReportRepository for TomlDataStore {
    async fn insert_report(&self, report: &ProfileReport) -> Result<ProfileReport> {
        let report = report.clone();
        self.update(move |data| {
            if data.reports.iter().any(|existing| existing.id == report.id) {
                return Err(ReelhubError::persistence(format!(
                    "report '{}' already exists",
                    report.id
                )));
            }
            data.reports.push(report.clone());
            Ok(report)
        })
        .await
    }
}
