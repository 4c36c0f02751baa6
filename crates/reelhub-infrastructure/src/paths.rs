//! Path resolution for Reelhub files.
//!
//! ```text
//! ~/.config/reelhub/
//! └── config.toml      # Application configuration
//! ```

use reelhub_core::error::{ReelhubError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "reelhub";
const CONFIG_FILE: &str = "config.toml";

pub struct ReelhubPaths;

impl ReelhubPaths {
    /// Platform configuration directory for Reelhub (e.g. `~/.config/reelhub/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| ReelhubError::config("Cannot find the user configuration directory"))
    }

    /// Default location of `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}
