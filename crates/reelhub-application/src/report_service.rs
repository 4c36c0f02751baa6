//! Profile Report Service
//!
//! Lets a signed-in user flag another profile for review.

use crate::auth::authenticate;
use chrono::Utc;
use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::identity::IdentityProvider;
use reelhub_core::report::{ProfileReport, ReportRepository};
use std::sync::Arc;
use uuid::Uuid;

pub struct ProfileReportService {
    identity: Arc<dyn IdentityProvider>,
    reports: Arc<dyn ReportRepository>,
}

impl ProfileReportService {
    pub fn new(identity: Arc<dyn IdentityProvider>, reports: Arc<dyn ReportRepository>) -> Self {
        Self { identity, reports }
    }

    /// Files a report against `profile_id`.
    ///
    /// Both `profile_id` and `reason` are required; surrounding whitespace is
    /// dropped before storing.
    pub async fn report_profile(
        &self,
        access_token: &str,
        profile_id: &str,
        reason: &str,
    ) -> Result<ProfileReport> {
        let profile_id = profile_id.trim();
        let reason = reason.trim();
        if profile_id.is_empty() {
            return Err(ReelhubError::validation("profile_id", "is required"));
        }
        if reason.is_empty() {
            return Err(ReelhubError::validation("reason", "is required"));
        }

        let identity = authenticate(self.identity.as_ref(), access_token).await?;

        let report = ProfileReport {
            id: Uuid::new_v4().to_string(),
            profile_id: profile_id.to_string(),
            reported_by: identity.owner_id,
            reason: reason.to_string(),
            created_at: Utc::now(),
        };

        let created = self.reports.insert_report(&report).await.map_err(|e| {
            tracing::error!("[ProfileReport] Failed to store report: {}", e);
            ReelhubError::persistence(e.to_string())
        })?;
        tracing::info!(
            "[ProfileReport] {} reported profile {}",
            created.reported_by,
            created.profile_id
        );
        Ok(created)
    }
}
