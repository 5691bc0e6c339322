mod commands;
mod render;
mod utils;

use anyhow::{Context, Result};
use calmirror_core::{MirrorConfig, SyncSession};
use calmirror_provider_google::{CalendarRole, GoogleCalendar};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calmirror")]
#[command(about = "Mirror your work calendar into your personal calendar as anonymized busy blocks")]
struct Cli {
    /// Show what would be created and deleted without changing anything
    #[arg(long)]
    dry_run: bool,

    /// List every event instead of counts
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = MirrorConfig::load().context("Failed to load configuration")?;
    tracing::debug!(
        work = %config.work_calendar_id,
        personal = %config.personal_calendar_id,
        project = %config.project_id,
        "Loaded configuration"
    );

    let work = GoogleCalendar::connect(&config.project_id, CalendarRole::Work).await?;
    let personal = GoogleCalendar::connect(&config.project_id, CalendarRole::Personal).await?;

    let session = SyncSession::new(config, work, personal);
    let failed = commands::sync::run(session, cli.dry_run, cli.verbose).await?;

    if failed > 0 {
        anyhow::bail!(
            "{} of the mirror's creates and deletes failed; rerun to retry them",
            failed
        );
    }

    Ok(())
}
