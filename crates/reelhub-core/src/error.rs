//! Error types for the Reelhub application.

use crate::media::AssetKind;
use crate::profile::ProfileField;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Banned terms found in a single free-text field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// The field that contained the terms
    pub field: ProfileField,
    /// Every banned term matched in the field, sorted
    pub terms: Vec<String>,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} contains [{}]", self.field, self.terms.join(", "))
    }
}

/// A shared error type for the entire Reelhub application.
///
/// The first group of variants is the submission taxonomy surfaced to end
/// users. The remaining variants are plumbing errors from adapters.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ReelhubError {
    /// The caller's identity could not be established or has expired
    #[error("Not authenticated: {reason}")]
    Unauthenticated { reason: String },

    /// A field failed validation before moderation ran
    #[error("Validation rejected for {field}: {reason}")]
    ValidationRejected { field: String, reason: String },

    /// One or more free-text fields contain banned terms
    #[error("Policy violation: {}", .violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    PolicyViolation { violations: Vec<FieldViolation> },

    /// The banned-word list could not be read, so no text can be accepted
    #[error("Content policy unavailable: {cause}")]
    PolicyUnavailable { cause: String },

    /// Transfer of a new media asset failed
    #[error("Upload failed for {asset_kind}: {cause}")]
    UploadFailed { asset_kind: AssetKind, cause: String },

    /// The profile row could not be read or written
    #[error("Persistence failed: {cause}")]
    PersistenceFailed { cause: String },

    /// Another submission for the same owner is still in flight
    #[error("A profile submission is already in progress for owner '{owner_id}'")]
    SubmissionInProgress { owner_id: String },

    /// The submission was cancelled before anything was persisted
    #[error("Submission abandoned before persisting")]
    SubmissionAbandoned,

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReelhubError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Unauthenticated error
    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self::Unauthenticated {
            reason: reason.into(),
        }
    }

    /// Creates a ValidationRejected error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationRejected {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a PolicyUnavailable error
    pub fn policy_unavailable(cause: impl Into<String>) -> Self {
        Self::PolicyUnavailable {
            cause: cause.into(),
        }
    }

    /// Creates an UploadFailed error
    pub fn upload_failed(asset_kind: AssetKind, cause: impl Into<String>) -> Self {
        Self::UploadFailed {
            asset_kind,
            cause: cause.into(),
        }
    }

    /// Creates a PersistenceFailed error
    pub fn persistence(cause: impl Into<String>) -> Self {
        Self::PersistenceFailed {
            cause: cause.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an Unauthenticated error
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. })
    }

    /// Check if this is a PolicyViolation error
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, Self::PolicyViolation { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true when resubmitting the same draft may succeed.
    ///
    /// Validation and policy failures are terminal: retrying the same draft
    /// yields the same answer.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::PolicyUnavailable { .. }
                | Self::UploadFailed { .. }
                | Self::PersistenceFailed { .. }
                | Self::SubmissionInProgress { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ReelhubError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ReelhubError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ReelhubError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ReelhubError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at binary boundaries)
impl From<anyhow::Error> for ReelhubError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, ReelhubError>`.
pub type Result<T> = std::result::Result<T, ReelhubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_violation_lists_every_field() {
        let err = ReelhubError::PolicyViolation {
            violations: vec![
                FieldViolation {
                    field: ProfileField::FullName,
                    terms: vec!["foo".to_string()],
                },
                FieldViolation {
                    field: ProfileField::Bio,
                    terms: vec!["bar".to_string(), "baz".to_string()],
                },
            ],
        };

        let message = err.to_string();
        assert!(message.contains("full_name contains [foo]"));
        assert!(message.contains("bio contains [bar, baz]"));
        assert!(err.is_policy_violation());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_upload_failed_names_asset_kind() {
        let err = ReelhubError::upload_failed(AssetKind::Banner, "status 500");
        assert_eq!(err.to_string(), "Upload failed for banner: status 500");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ReelhubError = io.into();
        match err {
            ReelhubError::Io { message } => assert!(message.contains("NotFound")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
