//! `profile_reports` table over PostgREST.

use super::client::RestClient;
use async_trait::async_trait;
use reelhub_core::error::{ReelhubError, Result};
use reelhub_core::report::{ProfileReport, ReportRepository};
use reqwest::Method;

pub struct RestReportRepository {
    client: RestClient,
}

impl RestReportRepository {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReportRepository for RestReportRepository {
    async fn insert_report(&self, report: &ProfileReport) -> Result<ProfileReport> {
        let url = self.client.endpoint(&["rest", "v1", "profile_reports"])?;
        let request = self
            .client
            .service_request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&[report]);

        let rows: Vec<ProfileReport> = self
            .client
            .send(request)
            .await?
            .json()
            .await
            .map_err(|e| ReelhubError::io(format!("invalid profile_reports response: {e}")))?;

        Ok(rows.into_iter().next().unwrap_or_else(|| report.clone()))
    }
}
