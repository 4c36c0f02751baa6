//! Configuration service implementation.
//!
//! Loads [`RootConfig`] from `config.toml` (by default
//! `~/.config/reelhub/config.toml`) and lets a few environment variables
//! override the backend credentials.

use crate::paths::ReelhubPaths;
use reelhub_core::config::RootConfig;
use reelhub_core::error::{ReelhubError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

pub const ENV_PROJECT_URL: &str = "REELHUB_PROJECT_URL";
pub const ENV_API_KEY: &str = "REELHUB_API_KEY";
pub const ENV_SERVICE_KEY: &str = "REELHUB_SERVICE_KEY";

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit file; `None` means the default location
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Service reading the default `~/.config/reelhub/config.toml`.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Service reading `path` instead of the default location.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Path of the file this service reads.
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => ReelhubPaths::config_file(),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|_| ReelhubError::internal("config cache lock poisoned"))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = Self::load_from(&self.config_path()?)?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        let mut write_lock = self
            .config
            .write()
            .map_err(|_| ReelhubError::internal("config cache lock poisoned"))?;
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        match self.config.write() {
            Ok(mut write_lock) => *write_lock = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    /// Reads `path` without touching the cache or the environment.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<RootConfig> {
        if !path.exists() {
            tracing::debug!(
                "[ConfigService] {} not found, using defaults",
                path.display()
            );
            return Ok(RootConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: RootConfig = toml::from_str(&content)
            .map_err(|e| ReelhubError::config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("[ConfigService] Loaded {}", path.display());
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// Overrides backend credentials with non-empty values from `lookup`.
pub fn apply_env_overrides<F>(config: &mut RootConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(value) = non_empty(ENV_PROJECT_URL) {
        config.backend.project_url = value;
    }
    if let Some(value) = non_empty(ENV_API_KEY) {
        config.backend.api_key = value;
    }
    if let Some(value) = non_empty(ENV_SERVICE_KEY) {
        config.backend.service_key = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelhub_core::config::BackendKind;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigService::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, RootConfig::default());
    }

    #[test]
    fn test_invalid_file_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[limits]\nbio = \"many\"\n").unwrap();

        let err = ConfigService::load_from(&path).unwrap_err();
        assert!(matches!(err, ReelhubError::Config(_)));
    }

    #[test]
    fn test_cache_is_reloaded_after_invalidate() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[backend]\nkind = \"local\"\n").unwrap();

        let service = ConfigService::with_path(&path);
        assert_eq!(service.get_config().unwrap().backend.kind, BackendKind::Local);

        std::fs::write(&path, "[backend]\nkind = \"rest\"\n").unwrap();
        assert_eq!(service.get_config().unwrap().backend.kind, BackendKind::Local);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().backend.kind, BackendKind::Rest);
    }

    #[test]
    fn test_env_overrides_only_non_empty_values() {
        let mut config = RootConfig::default();
        config.backend.api_key = "from-file".to_string();

        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_PROJECT_URL, "https://env.example.co"),
            (ENV_API_KEY, "  "),
            (ENV_SERVICE_KEY, "service-secret"),
        ]);
        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend.project_url, "https://env.example.co");
        assert_eq!(config.backend.api_key, "from-file");
        assert_eq!(config.backend.service_key, "service-secret");
    }
}
