//! Adapters for the hosted backend-as-a-service.
//!
//! - `auth/v1` for identity
//! - `rest/v1` (PostgREST) for the `profiles`, `banned_words` and
//!   `profile_reports` tables
//! - `storage/v1` for avatar and banner objects

pub mod banned_words;
pub mod client;
pub mod identity;
pub mod object_store;
pub mod profiles;
pub mod reports;

pub use banned_words::RestBannedWordRepository;
pub use client::RestClient;
pub use identity::RestIdentityProvider;
pub use object_store::RestObjectStore;
pub use profiles::RestProfileRepository;
pub use reports::RestReportRepository;
