//! Serve command - Run the Tally sync server
//!
//! Wires the warehouse, control store, and sync orchestrator together,
//! then runs one scheduler per workspace until interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::signal;
use tracing::info;

use tally_config::Config;
use tally_sync::{SyncOrchestrator, SyncScheduler};

use crate::bootstrap;

/// Serve command arguments
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file (defaults to configs/config.toml if not specified)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the serve command
pub async fn run(_args: ServeArgs, config: Config) -> Result<()> {
    info!("Starting Tally sync server");

    let warehouse = bootstrap::build_warehouse(&config)?;
    warehouse
        .create_tables()
        .await
        .context("failed to create warehouse tables")?;

    let control = bootstrap::open_control(&config).await?;
    let seeded = bootstrap::seed_connectors(&config, &control).await?;
    if seeded > 0 {
        info!(count = seeded, "Connector credentials loaded from config");
    }

    let orchestrator = Arc::new(
        SyncOrchestrator::new(config.sync.clone(), warehouse, control)
            .with_batch_size(config.global.batch_size),
    );

    let workspaces = bootstrap::config_workspaces(&config);
    info!(
        workspaces = ?workspaces,
        interval_secs = config.sync.interval_secs,
        "Sync schedulers starting"
    );

    let mut handles = Vec::with_capacity(workspaces.len());
    for workspace_id in workspaces {
        let scheduler = SyncScheduler::new(
            orchestrator.clone(),
            workspace_id,
            config.sync.interval_secs,
        );
        handles.push(tokio::spawn(async move { scheduler.run().await }));
    }

    signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received, stopping schedulers");

    for handle in handles {
        handle.abort();
    }

    Ok(())
}
