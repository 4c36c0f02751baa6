use anyhow::{Context, Result};
use reelhub_core::config::{BackendKind, RootConfig};
use reelhub_core::media::PublicUrlCodec;
use reelhub_infrastructure::{Backend, ConfigService};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Configuration shared by every command.
pub struct CliContext {
    pub config: RootConfig,
}

impl CliContext {
    /// Loads the configuration and installs the log subscriber.
    ///
    /// `RUST_LOG` wins over `log_level` from the file.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let service = match config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new(),
        };
        let config = service.get_config().context("Failed to load configuration")?;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();

        tracing::debug!(
            "[CLI] Configuration loaded from {}",
            service
                .config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "<unknown>".to_string())
        );
        Ok(Self { config })
    }

    pub fn backend(&self) -> Result<Backend> {
        Backend::from_config(&self.config).context("Failed to set up backend")
    }

    /// Codec for public URLs of the configured backend, without connecting to it.
    pub fn url_codec(&self) -> Result<PublicUrlCodec> {
        let base = match self.config.backend.kind {
            BackendKind::Rest => &self.config.backend.project_url,
            BackendKind::Local => &self.config.local.public_base_url,
        };
        PublicUrlCodec::new(base).context("Invalid public base URL")
    }
}
