//! Init command - Seed the control store from the config file
//!
//! Stores credentials from the `[connectors.*]` sections into the
//! control database and creates the warehouse tables, so a following
//! `tally sync` or `tally serve` starts from configured platforms.
//! With `--verify`, each enabled connector gets a live connection test
//! and the stored status reflects the result.
//!
//! # Usage
//!
//! ```bash
//! tally init --config configs/config.toml
//! tally init --verify
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use tally_config::Config;
use tally_connectors::factory;
use tally_control::{ConnectionStatus, ControlStore};

use crate::bootstrap;

/// Init command arguments
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Skip warehouse table creation
    #[arg(long)]
    pub no_tables: bool,

    /// Test each connector's credentials against its platform API
    #[arg(long)]
    pub verify: bool,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the init command
pub async fn run(args: InitArgs, config: Config) -> Result<()> {
    let control = bootstrap::open_control(&config).await?;
    let seeded = bootstrap::seed_connectors(&config, &control).await?;

    if !args.no_tables {
        let warehouse = bootstrap::build_warehouse(&config)?;
        warehouse
            .create_tables()
            .await
            .context("failed to create warehouse tables")?;
        println!("Warehouse tables created [{}]", warehouse.name());
    }

    if seeded == 0 {
        println!("No [connectors] entries in config; syncs will use demo data");
        return Ok(());
    }
    println!("Stored credentials for {} connector(s)", seeded);

    if args.verify {
        for workspace_id in bootstrap::config_workspaces(&config) {
            verify_workspace(&control, workspace_id).await?;
        }
    }

    Ok(())
}

/// Test every enabled connector in a workspace and record the outcome
async fn verify_workspace(control: &ControlStore, workspace_id: u32) -> Result<()> {
    let configs = control.platform_configs().list(workspace_id).await?;

    for stored in configs.iter().filter(|c| c.enabled) {
        let status = match check_connection(stored, workspace_id).await {
            Ok(true) => ConnectionStatus::Connected,
            Ok(false) | Err(_) => ConnectionStatus::Error,
        };
        control
            .platform_configs()
            .set_status(workspace_id, stored.platform, status)
            .await?;
        println!(
            "workspace {} {:<12} {}",
            workspace_id,
            stored.platform.as_str(),
            status.as_str()
        );
    }

    Ok(())
}

async fn check_connection(
    stored: &tally_control::PlatformConfig,
    workspace_id: u32,
) -> Result<bool> {
    let connector = factory::build(stored.platform, &stored.credentials, workspace_id)?;
    connector.authenticate().await?;
    Ok(connector.test_connection().await?)
}
