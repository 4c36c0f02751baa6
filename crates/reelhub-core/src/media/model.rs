//! Media asset domain model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which profile image an asset is.
///
/// Determines the storage bucket and the profile column that references it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetKind {
    Avatar,
    Banner,
}

impl AssetKind {
    /// Bucket (and top-level folder inside it) holding this kind of asset.
    pub fn bucket(&self) -> &'static str {
        match self {
            AssetKind::Avatar => "avatars",
            AssetKind::Banner => "banners",
        }
    }
}

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Name of the file on the user's machine
    pub file_name: String,
    /// MIME type, if known
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Result of a successful asset replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacedAsset {
    pub kind: AssetKind,
    /// Public URL of the new asset
    pub public_url: String,
    /// Path of the new asset inside its bucket
    pub storage_path: String,
    /// Soft warnings, e.g. the previous asset could not be deleted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Reduces a file name to characters that are safe in a URL path.
///
/// Anything outside `[A-Za-z0-9._-]` becomes `_`. Leading dots are replaced
/// too so that no path segment is `.` or `..`.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    sanitize_segment(base, "file")
}

/// Owner id as it appears in storage paths, under the same rules as file names.
pub fn sanitize_owner_id(owner_id: &str) -> String {
    sanitize_segment(owner_id, "owner")
}

fn sanitize_segment(segment: &str, fallback: &str) -> String {
    let sanitized: String = segment
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || (c == '.' && i > 0) {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        fallback.to_string()
    } else {
        sanitized
    }
}

/// Builds the storage path of a new asset.
///
/// Layout: `{bucket}/{owner_id}-{timestamp_millis}-{file_name}`, with both the
/// owner id and the file name sanitized. The owner id prefix keeps every
/// stored object traceable to its owner so unreferenced objects can be found
/// by a later sweep.
pub fn storage_path(kind: AssetKind, owner_id: &str, timestamp_millis: i64, file_name: &str) -> String {
    format!(
        "{}/{}-{}-{}",
        kind.bucket(),
        sanitize_owner_id(owner_id),
        timestamp_millis,
        sanitize_file_name(file_name)
    )
}

/// Returns true if `path` was generated for `owner_id`.
///
/// The owner segment must be followed by `-{digits}-`. An owner id that is
/// another id plus a `-{digits}` suffix is still indistinguishable; fixed
/// length ids such as UUIDs never collide this way.
pub fn is_owned_by(kind: AssetKind, path: &str, owner_id: &str) -> bool {
    let owner = sanitize_owner_id(owner_id);
    path.strip_prefix(kind.bucket())
        .and_then(|rest| rest.strip_prefix('/'))
        .and_then(|rest| rest.strip_prefix(owner.as_str()))
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|rest| rest.split_once('-'))
        .is_some_and(|(millis, name)| {
            !millis.is_empty() && millis.chars().all(|c| c.is_ascii_digit()) && !name.is_empty()
        })
}
