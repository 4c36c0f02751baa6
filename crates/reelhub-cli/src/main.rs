use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use reelhub_core::media::AssetKind;
use std::path::PathBuf;

mod commands;
mod context;

#[derive(Parser)]
#[command(name = "reelhub")]
#[command(about = "Reelhub CLI - moderated profile editing", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.config/reelhub/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or edit the caller's profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Check text against the banned-word list
    Policy {
        #[command(subcommand)]
        action: PolicyAction,
    },
    /// Report another profile
    Report {
        #[arg(long)]
        token: String,
        #[arg(long)]
        profile_id: String,
        #[arg(long)]
        reason: String,
    },
    /// Public URL helpers
    Asset {
        #[command(subcommand)]
        action: AssetAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the stored profile with word counters
    Show {
        #[arg(long)]
        token: String,
    },
    /// Submit changes; omitted fields keep their stored values
    Edit {
        #[arg(long)]
        token: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Birthdate as YYYY-MM-DD
        #[arg(long, conflicts_with = "clear_birthdate")]
        birthdate: Option<NaiveDate>,
        #[arg(long)]
        clear_birthdate: bool,
        /// New avatar image
        #[arg(long)]
        avatar: Option<PathBuf>,
        /// New banner image
        #[arg(long)]
        banner: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PolicyAction {
    /// Print the banned terms found in TEXT
    Check { text: String },
}

#[derive(Subcommand)]
enum AssetAction {
    /// Print the storage path behind a public URL
    Resolve {
        url: String,
        #[arg(long, default_value = "avatar")]
        kind: AssetKind,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = context::CliContext::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Profile { action } => match action {
            ProfileAction::Show { token } => commands::profile::show(&ctx, &token).await?,
            ProfileAction::Edit {
                token,
                full_name,
                username,
                bio,
                location,
                birthdate,
                clear_birthdate,
                avatar,
                banner,
            } => {
                let args = commands::profile::EditArgs {
                    token,
                    full_name,
                    username,
                    bio,
                    location,
                    birthdate: if clear_birthdate {
                        Some(None)
                    } else {
                        birthdate.map(Some)
                    },
                    avatar,
                    banner,
                };
                commands::profile::edit(&ctx, args).await?
            }
        },
        Commands::Policy { action } => match action {
            PolicyAction::Check { text } => commands::policy::check(&ctx, &text).await?,
        },
        Commands::Report {
            token,
            profile_id,
            reason,
        } => commands::report::report(&ctx, &token, &profile_id, &reason).await?,
        Commands::Asset { action } => match action {
            AssetAction::Resolve { url, kind } => commands::asset::resolve(&ctx, &url, kind)?,
        },
    }

    Ok(())
}
