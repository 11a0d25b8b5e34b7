//! Status command - Show platform connections and recent sync passes
//!
//! Reads the control store directly; no server needs to be running.
//!
//! # Usage
//!
//! ```bash
//! tally status
//! tally status --workspace 2 --limit 5
//! tally status --json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use tally_config::Config;

use crate::bootstrap;

/// Status command arguments
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Workspace to inspect
    #[arg(short, long, default_value_t = 1)]
    pub workspace: u32,

    /// How many recent sync passes to show
    #[arg(short, long, default_value_t = 10)]
    pub limit: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the status command
pub async fn run(args: StatusArgs, config: Config) -> Result<()> {
    let warehouse = bootstrap::build_warehouse(&config)?;
    let warehouse_ok = warehouse.health_check().await.is_ok();

    let control = bootstrap::open_control(&config).await?;

    let configs = control
        .platform_configs()
        .list(args.workspace)
        .await
        .context("failed to list platform configs")?;
    let logs = control
        .sync_logs()
        .recent(args.workspace, args.limit)
        .await
        .context("failed to list sync logs")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "workspace_id": args.workspace,
                "warehouse": {
                    "backend": warehouse.name(),
                    "healthy": warehouse_ok,
                },
                "platforms": configs,
                "recent_syncs": logs,
            }))?
        );
        return Ok(());
    }

    println!(
        "Warehouse: {} [{}]",
        warehouse.name(),
        if warehouse_ok { "healthy" } else { "unreachable" }
    );
    println!();
    println!("Platforms (workspace {})", args.workspace);
    println!(
        "{:<12} {:<9} {:<14} {}",
        "Platform", "Enabled", "Status", "Last sync"
    );
    println!("{}", "-".repeat(58));
    if configs.is_empty() {
        println!("(none configured - syncs fall back to demo data)");
    }
    for cfg in &configs {
        let last_sync = cfg
            .last_sync
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{:<12} {:<9} {:<14} {}",
            cfg.platform.as_str(),
            if cfg.enabled { "yes" } else { "no" },
            cfg.status.as_str(),
            last_sync
        );
    }

    println!();
    println!("Recent syncs");
    println!(
        "{:<22} {:<11} {:>4} ok {:>4} failed  {}",
        "Started", "Status", "", "", "Platforms"
    );
    println!("{}", "-".repeat(70));
    if logs.is_empty() {
        println!("(no sync passes recorded)");
    }
    for log in &logs {
        let platforms: Vec<&str> = log.platforms.iter().map(|p| p.as_str()).collect();
        println!(
            "{:<22} {:<11} {:>4} ok {:>4} failed  {}",
            log.started_at.format("%Y-%m-%d %H:%M:%S"),
            log.status.as_str(),
            log.success_count,
            log.error_count,
            platforms.join(", ")
        );
    }

    Ok(())
}
