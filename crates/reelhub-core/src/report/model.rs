//! Profile report domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's report that another profile breaks the rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    pub id: String,
    /// The reported profile
    pub profile_id: String,
    /// Owner id of the reporting user
    pub reported_by: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
