//! Domain layer for Reelhub.
//!
//! Holds the profile model, the content policy filter, media asset naming and
//! the traits through which the application reaches its external services
//! (identity provider, relational store, object store).

pub mod config;
pub mod error;
pub mod identity;
pub mod media;
pub mod moderation;
pub mod profile;
pub mod report;

// Re-export common error type
pub use error::{ReelhubError, Result};
