use crate::context::CliContext;
use anyhow::Result;
use reelhub_application::ProfileReportService;

pub async fn report(ctx: &CliContext, token: &str, profile_id: &str, reason: &str) -> Result<()> {
    let backend = ctx.backend()?;
    let report = ProfileReportService::new(backend.identity, backend.reports)
        .report_profile(token, profile_id, reason)
        .await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
