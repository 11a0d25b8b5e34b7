//! Sync command - Run one sync pass and exit
//!
//! # Usage
//!
//! ```bash
//! # Sync every platform for workspace 1
//! tally sync
//!
//! # Sync selected platforms, ignoring stored checkpoints
//! tally sync --platform shopify --platform meta_ads --force
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use tally_config::Config;
use tally_model::Platform;
use tally_sync::{PlatformSelection, SyncOrchestrator, SyncStatus};

use crate::bootstrap;

/// Sync command arguments
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Workspace to sync
    #[arg(short, long, default_value_t = 1)]
    pub workspace: u32,

    /// Platform to sync (repeatable; all platforms if omitted)
    #[arg(short, long = "platform", value_name = "PLATFORM")]
    pub platforms: Vec<String>,

    /// Ignore stored checkpoints and re-fetch the full lookback window
    #[arg(short, long)]
    pub force: bool,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the sync command
pub async fn run(args: SyncArgs, config: Config) -> Result<()> {
    let selection = parse_selection(&args.platforms)?;

    let warehouse = bootstrap::build_warehouse(&config)?;
    warehouse
        .create_tables()
        .await
        .context("failed to create warehouse tables")?;

    let control = bootstrap::open_control(&config).await?;
    bootstrap::seed_connectors(&config, &control).await?;

    let orchestrator = Arc::new(
        SyncOrchestrator::new(config.sync.clone(), warehouse, control)
            .with_batch_size(config.global.batch_size),
    );

    let summary = orchestrator
        .sync(args.workspace, selection, args.force)
        .await
        .context("sync pass failed")?;

    println!(
        "{:<12} {:<10} {:>8} {:>7} {:>9}",
        "Platform", "Status", "Records", "Pages", "Time"
    );
    println!("{}", "-".repeat(50));
    for report in &summary.reports {
        println!(
            "{:<12} {:<10} {:>8} {:>7} {:>7}ms",
            report.platform.as_str(),
            status_str(report.status),
            report.records_written,
            report.pages,
            report.duration_ms
        );
        if let Some(error) = &report.error {
            println!("             {}", error);
        }
    }
    println!("{}", "-".repeat(50));
    println!(
        "{} records written, {} succeeded, {} failed",
        summary.records_written(),
        summary.success_count,
        summary.error_count
    );

    if summary.error_count > 0 {
        anyhow::bail!("{} platform(s) failed to sync", summary.error_count);
    }
    Ok(())
}

fn parse_selection(platforms: &[String]) -> Result<PlatformSelection> {
    if platforms.is_empty() || platforms.iter().any(|p| p.eq_ignore_ascii_case("all")) {
        return Ok(PlatformSelection::All);
    }
    let parsed = platforms
        .iter()
        .map(|s| {
            s.parse::<Platform>()
                .map_err(|e| anyhow::anyhow!("invalid platform '{}': {}", s, e))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(PlatformSelection::Only(parsed))
}

fn status_str(status: SyncStatus) -> &'static str {
    match status {
        SyncStatus::Completed => "completed",
        SyncStatus::Failed => "failed",
        SyncStatus::Skipped => "skipped",
        SyncStatus::Demo => "demo",
    }
}
