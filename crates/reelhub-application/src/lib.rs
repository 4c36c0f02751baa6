//! Application layer for Reelhub.
//!
//! This crate provides the use cases that coordinate the domain model with
//! the identity provider, relational store and object store adapters.

mod auth;
pub mod media_replacement;
pub mod owner_lock;
pub mod profile_query;
pub mod profile_upsert;
pub mod report_service;
pub mod submission;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use media_replacement::{MediaReplacementManager, UploadedAsset};
pub use owner_lock::{OwnerLockGuard, OwnerLocks};
pub use profile_query::ProfileQueryService;
pub use profile_upsert::ProfileUpsertCoordinator;
pub use report_service::ProfileReportService;
pub use submission::{ProfileSubmission, SubmissionMonitor, SubmissionOutcome, SubmissionState};
