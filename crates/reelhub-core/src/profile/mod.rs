//! Profile domain module.
//!
//! # Module Structure
//!
//! - `model`: Profile, draft and change-set types
//! - `limits`: Word counting and clamping
//! - `repository`: Relational store trait

mod limits;
mod model;
mod repository;

pub use limits::{FieldUsage, WordLimits, clamp_words, word_count};
pub use model::{Profile, ProfileChanges, ProfileDraft, ProfileField};
pub use repository::ProfileRepository;
