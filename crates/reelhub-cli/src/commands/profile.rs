use crate::context::CliContext;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use reelhub_application::{
    ProfileQueryService, ProfileSubmission, ProfileUpsertCoordinator, SubmissionMonitor,
};
use reelhub_core::identity::IdentityProvider;
use reelhub_core::media::{AssetKind, UploadFile};
use reelhub_core::profile::ProfileDraft;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;

pub struct EditArgs {
    pub token: String,
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub birthdate: Option<Option<NaiveDate>>,
    pub avatar: Option<PathBuf>,
    pub banner: Option<PathBuf>,
}

pub async fn show(ctx: &CliContext, token: &str) -> Result<()> {
    let backend = ctx.backend()?;
    let service = ProfileQueryService::new(backend.identity, backend.profiles)
        .with_limits(ctx.config.limits);

    let profile = service.load_for_edit(token).await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);
    for usage in service.field_usage(&profile) {
        println!("{}: {}/{} words", usage.field, usage.words, usage.limit);
    }
    Ok(())
}

pub async fn edit(ctx: &CliContext, args: EditArgs) -> Result<()> {
    let backend = ctx.backend()?;

    // The owner id comes from the token; the coordinator re-checks it.
    let identity = backend
        .identity
        .current_identity(&args.token)
        .await
        .context("Failed to resolve access token")?;

    let draft = ProfileDraft {
        full_name: args.full_name,
        username: args.username,
        bio: args.bio,
        location: args.location,
        birthdate: args.birthdate,
    };

    let mut submission = ProfileSubmission::new(identity.owner_id, args.token, draft);
    if let Some(path) = &args.avatar {
        submission = submission.with_avatar(read_upload(path).await?);
    }
    if let Some(path) = &args.banner {
        submission = submission.with_banner(read_upload(path).await?);
    }

    let monitor = submission.monitor();
    let mut watchers = Vec::new();
    if args.avatar.is_some() {
        watchers.push(print_progress(&monitor, AssetKind::Avatar));
    }
    if args.banner.is_some() {
        watchers.push(print_progress(&monitor, AssetKind::Banner));
    }
    watchers.push(abandon_on_ctrl_c(monitor.clone()));

    let coordinator = ProfileUpsertCoordinator::new(
        backend.identity,
        backend.profiles,
        backend.banned_words,
        backend.object_store,
    )
    .with_config(&ctx.config);
    let result = coordinator.submit_profile(submission).await;

    for watcher in watchers {
        watcher.abort();
    }

    let outcome = result?;
    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning);
    }
    println!("{}", serde_json::to_string_pretty(&outcome.profile)?);
    Ok(())
}

async fn read_upload(path: &Path) -> Result<UploadFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadFile::new(file_name, bytes))
}

fn print_progress(monitor: &SubmissionMonitor, kind: AssetKind) -> JoinHandle<()> {
    let mut receiver = match kind {
        AssetKind::Avatar => monitor.avatar_progress(),
        AssetKind::Banner => monitor.banner_progress(),
    };
    tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let percent = *receiver.borrow_and_update();
            eprintln!("{}: {}%", kind, percent);
        }
    })
}

fn abandon_on_ctrl_c(monitor: SubmissionMonitor) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            monitor.abandon();
        }
    })
}
