//! Infrastructure layer for Reelhub.
//!
//! Adapters for the identity provider, relational store and object store
//! traits defined in `reelhub-core`, plus configuration loading.

pub mod backend;
pub mod config_service;
pub mod local;
pub mod paths;
pub mod rest;
pub mod storage;

pub use backend::Backend;
pub use config_service::ConfigService;
pub use paths::ReelhubPaths;
