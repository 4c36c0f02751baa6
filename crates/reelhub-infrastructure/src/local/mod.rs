//! Local development backend.
//!
//! - `toml_store`: profiles, banned words and reports in one TOML file
//! - `fs_object_store`: avatar and banner objects under a directory
//! - `static_identity`: access tokens from the configuration file

pub mod fs_object_store;
pub mod static_identity;
pub mod toml_store;

pub use fs_object_store::FileSystemObjectStore;
pub use static_identity::StaticTokenIdentityProvider;
pub use toml_store::{LocalData, TomlDataStore};
