//! Checks on a submission that do not need any external service.

use chrono::NaiveDate;
use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::media::{AssetKind, UploadFile};
use reelhub_core::profile::ProfileDraft;

/// Infers the MIME type from a filename extension using the `mime_guess` library.
fn infer_mime_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}

/// Content type of `file`: the declared one, else a guess from its name.
pub fn effective_content_type(file: &UploadFile) -> String {
    match file.content_type.as_deref() {
        Some(declared) if !declared.trim().is_empty() => declared.trim().to_ascii_lowercase(),
        _ => infer_mime_type(&file.file_name),
    }
}

/// Rejects empty, oversized and non-image files.
pub fn validate_upload(kind: AssetKind, file: &UploadFile, max_bytes: u64) -> Result<()> {
    let field = kind.to_string();
    if file.bytes.is_empty() {
        return Err(ReelhubError::validation(field, "file is empty"));
    }
    if file.size() > max_bytes {
        return Err(ReelhubError::validation(
            field,
            format!("file is {} bytes, limit is {}", file.size(), max_bytes),
        ));
    }
    let content_type = effective_content_type(file);
    if !content_type.starts_with("image/") {
        return Err(ReelhubError::validation(
            field,
            format!("'{}' is not an image ({})", file.file_name, content_type),
        ));
    }
    Ok(())
}

/// Rejects a birthdate later than `today`. Clearing the birthdate is allowed.
pub fn validate_draft(draft: &ProfileDraft, today: NaiveDate) -> Result<()> {
    if let Some(Some(birthdate)) = draft.birthdate {
        if birthdate > today {
            return Err(ReelhubError::validation(
                "birthdate",
                format!("{} is in the future", birthdate),
            ));
        }
    }
    Ok(())
}
