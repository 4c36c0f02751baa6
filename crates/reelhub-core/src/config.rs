//! Configuration model.
//!
//! Mirrors `~/.config/reelhub/config.toml`. Every section is optional and
//! falls back to its defaults.

use crate::profile::WordLimits;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Which backend the adapters talk to.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Hosted backend-as-a-service reached over HTTP
    #[default]
    Rest,
    /// Files on the local machine, for development
    Local,
}

/// What happens when a second submission arrives for an owner whose first
/// submission is still running.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrentSubmissionPolicy {
    /// Fail the second submission with `SubmissionInProgress`
    #[default]
    Reject,
    /// Queue the second submission until the first one finishes
    Wait,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Project base URL, e.g. `https://xyz.example.co`
    pub project_url: String,
    /// Public API key sent with every request
    pub api_key: String,
    /// Server-side key used for row and object access
    pub service_key: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LocalBackendConfig {
    /// TOML file holding profiles, banned words and reports
    pub data_file: PathBuf,
    /// Directory holding uploaded objects, one sub-directory per bucket
    pub objects_dir: PathBuf,
    /// Base URL used to derive public URLs of local objects
    pub public_base_url: String,
    /// Access token to owner id table
    pub tokens: HashMap<String, String>,
}

impl Default for LocalBackendConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("reelhub-data.toml"),
            objects_dir: PathBuf::from("reelhub-objects"),
            public_base_url: "http://localhost:8080".to_string(),
            tokens: HashMap::new(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted avatar or banner file, in bytes
    pub max_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SubmissionConfig {
    pub on_concurrent: ConcurrentSubmissionPolicy,
}

/// Root of the configuration file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RootConfig {
    pub backend: BackendConfig,
    pub local: LocalBackendConfig,
    pub limits: WordLimits,
    pub uploads: UploadConfig,
    pub submissions: SubmissionConfig,
    pub log_level: String,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            local: LocalBackendConfig::default(),
            limits: WordLimits::default(),
            uploads: UploadConfig::default(),
            submissions: SubmissionConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: RootConfig = toml::from_str("").unwrap();
        assert_eq!(config, RootConfig::default());
        assert_eq!(config.limits.full_name, 5);
        assert_eq!(config.submissions.on_concurrent, ConcurrentSubmissionPolicy::Reject);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: RootConfig = toml::from_str(
            r#"
            log_level = "debug"

            [backend]
            kind = "local"

            [limits]
            bio = 60

            [submissions]
            on_concurrent = "wait"

            [local.tokens]
            "token-a" = "owner-a"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.kind, BackendKind::Local);
        assert_eq!(config.limits.bio, 60);
        assert_eq!(config.limits.username, 3);
        assert_eq!(config.submissions.on_concurrent, ConcurrentSubmissionPolicy::Wait);
        assert_eq!(config.local.tokens.get("token-a").map(String::as_str), Some("owner-a"));
        assert_eq!(config.uploads.max_bytes, 10 * 1024 * 1024);
    }
}
