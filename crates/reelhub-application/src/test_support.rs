//! In-memory collaborators shared by the use case tests.

use async_trait::async_trait;
use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::identity::{Identity, IdentityProvider};
use reelhub_core::media::{ObjectStore, PublicUrlCodec, UploadFile, UploadProgress};
use reelhub_core::moderation::BannedWordRepository;
use reelhub_core::profile::{Profile, ProfileChanges, ProfileRepository};
use reelhub_core::report::{ProfileReport, ReportRepository};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

pub const BASE_URL: &str = "https://project.example.co";

// ============================================================================
// Identity
// ============================================================================

pub struct StaticIdentity {
    tokens: HashMap<String, String>,
}

impl StaticIdentity {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            tokens: pairs
                .iter()
                .map(|(token, owner)| (token.to_string(), owner.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_identity(&self, access_token: &str) -> Result<Identity> {
        self.tokens
            .get(access_token)
            .map(Identity::new)
            .ok_or_else(|| ReelhubError::unauthenticated("session expired"))
    }
}

// ============================================================================
// Banned words
// ============================================================================

pub struct StaticBannedWords {
    words: Option<Vec<String>>,
}

impl StaticBannedWords {
    pub fn new(words: &[&str]) -> Self {
        Self {
            words: Some(words.iter().map(|w| w.to_string()).collect()),
        }
    }

    pub fn unavailable() -> Self {
        Self { words: None }
    }
}

#[async_trait]
impl BannedWordRepository for StaticBannedWords {
    async fn list_banned_words(&self) -> Result<Vec<String>> {
        self.words
            .clone()
            .ok_or_else(|| ReelhubError::io("banned_words table unreachable"))
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// Pauses an upsert or upload until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct MemoryProfiles {
    rows: Mutex<HashMap<String, Profile>>,
    upserts: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fail_upserts: AtomicBool,
    gate: Option<std::sync::Arc<Gate>>,
}

impl MemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gate(gate: std::sync::Arc<Gate>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        let profiles = Self::default();
        profiles.fail_upserts.store(true, Ordering::SeqCst);
        profiles
    }

    pub fn insert(&self, profile: Profile) {
        self.rows
            .lock()
            .unwrap()
            .insert(profile.id.clone(), profile);
    }

    pub fn stored(&self, owner_id: &str) -> Option<Profile> {
        self.rows.lock().unwrap().get(owner_id).cloned()
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfiles {
    async fn get_profile(&self, owner_id: &str) -> Result<Option<Profile>> {
        Ok(self.stored(owner_id))
    }

    async fn upsert_profile(&self, owner_id: &str, changes: &ProfileChanges) -> Result<Profile> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let result = if self.fail_upserts.load(Ordering::SeqCst) {
            Err(ReelhubError::io("profiles table unreachable"))
        } else {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .entry(owner_id.to_string())
                .or_insert_with(|| Profile::empty(owner_id));
            changes.apply_to(row);
            Ok(row.clone())
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Default)]
pub struct MemoryReports {
    pub reports: Mutex<Vec<ProfileReport>>,
}

#[async_trait]
impl ReportRepository for MemoryReports {
    async fn insert_report(&self, report: &ProfileReport) -> Result<ProfileReport> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(report.clone())
    }
}

// ============================================================================
// Objects
// ============================================================================

pub struct MemoryObjectStore {
    codec: PublicUrlCodec,
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    deletes: Mutex<Vec<(String, String)>>,
    fail_puts_for: Option<String>,
    fail_deletes: bool,
    gated_puts: Option<(String, std::sync::Arc<Gate>)>,
    cancel_on_put: Option<CancellationToken>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self {
            codec: PublicUrlCodec::new(BASE_URL).unwrap(),
            objects: Mutex::new(HashMap::new()),
            deletes: Mutex::new(Vec::new()),
            fail_puts_for: None,
            fail_deletes: false,
            gated_puts: None,
            cancel_on_put: None,
        }
    }

    /// Uploads to `bucket` stop halfway until `gate` is released.
    pub fn gated_puts(mut self, bucket: &str, gate: std::sync::Arc<Gate>) -> Self {
        self.gated_puts = Some((bucket.to_string(), gate));
        self
    }

    /// Every upload cancels `token` just before it reports success.
    pub fn cancelling_puts(mut self, token: CancellationToken) -> Self {
        self.cancel_on_put = Some(token);
        self
    }

    pub fn failing_puts(mut self, bucket: &str) -> Self {
        self.fail_puts_for = Some(bucket.to_string());
        self
    }

    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn insert(&self, bucket: &str, path: &str, bytes: Vec<u8>) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), path.to_string()), bytes);
    }

    pub fn contains(&self, bucket: &str, path: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), path.to_string()))
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn deletes(&self) -> Vec<(String, String)> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        path: &str,
        file: &UploadFile,
        progress: &UploadProgress,
    ) -> Result<()> {
        let total = file.size();
        progress.report(total / 2, total);
        tokio::task::yield_now().await;

        if let Some((gated, gate)) = &self.gated_puts {
            if gated == bucket {
                gate.entered.notify_one();
                gate.release.notified().await;
            }
        }

        if self.fail_puts_for.as_deref() == Some(bucket) {
            return Err(ReelhubError::io("status 503: storage unavailable"));
        }

        progress.report(total, total);
        self.insert(bucket, path, file.bytes.clone());
        if let Some(token) = &self.cancel_on_put {
            token.cancel();
        }
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, path: &str) -> Result<()> {
        self.deletes
            .lock()
            .unwrap()
            .push((bucket.to_string(), path.to_string()));
        if self.fail_deletes {
            return Err(ReelhubError::io("status 500: delete failed"));
        }
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), path.to_string()));
        Ok(())
    }

    fn url_codec(&self) -> &PublicUrlCodec {
        &self.codec
    }
}
