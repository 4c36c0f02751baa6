//! Profile report repository trait.

use super::model::ProfileReport;
use crate::error::Result;
use async_trait::async_trait;

/// Append-only store of profile reports.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Inserts a report and returns it as stored.
    async fn insert_report(&self, report: &ProfileReport) -> Result<ProfileReport>;
}
