//! Content moderation module.
//!
//! - `filter`: Substring matching of text against the banned-word list
//! - `repository`: Source of the banned-word list

mod filter;
mod repository;

pub use filter::{BannedWordList, ContentPolicyFilter};
pub use repository::BannedWordRepository;
