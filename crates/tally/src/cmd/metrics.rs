//! Metrics command - Compute KPIs over a time range
//!
//! Reads normalized records out of the warehouse and derives the KPI
//! set on the fly. Nothing is precomputed, so the numbers always
//! reflect the rows currently stored.
//!
//! # Usage
//!
//! ```bash
//! tally metrics --range 30d
//! tally metrics --range mtd --by-platform
//! tally metrics --range 2024-01-01,2024-03-31 --json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use tally_analytics::{MetricSet, MetricsEngine, TimeRange};
use tally_config::Config;

use crate::bootstrap;

/// Metrics command arguments
#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// Time range (today, yesterday, mtd, ytd, Nh, Nd, Ny, or start,end dates)
    #[arg(short, long, default_value = "30d")]
    pub range: String,

    /// Workspace to read
    #[arg(short, long, default_value_t = 1)]
    pub workspace: u32,

    /// Break the KPIs down per platform
    #[arg(long)]
    pub by_platform: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the metrics command
pub async fn run(args: MetricsArgs, config: Config) -> Result<()> {
    let range = TimeRange::parse(&args.range)
        .map_err(|e| anyhow::anyhow!("invalid range '{}': {}", args.range, e))?;

    let warehouse = bootstrap::build_warehouse(&config)?;
    let engine = MetricsEngine::new(warehouse).with_cogs_rate(config.sync.cogs_rate);

    if args.by_platform {
        let breakdown = engine
            .by_platform(args.workspace, &range)
            .await
            .context("failed to compute per-platform metrics")?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&breakdown)?);
            return Ok(());
        }

        for entry in &breakdown {
            println!("== {} ({} records)", entry.platform.as_str(), entry.records);
            print_metrics(&entry.metrics);
            println!();
        }
        return Ok(());
    }

    let metrics = engine
        .overview(args.workspace, &range)
        .await
        .context("failed to compute metrics")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    println!(
        "Workspace {} | {} .. {} ({} days)",
        args.workspace,
        range.start.format("%Y-%m-%d"),
        range.end.format("%Y-%m-%d"),
        range.days()
    );
    println!("{}", "-".repeat(44));
    print_metrics(&metrics);
    if metrics.is_demo_data {
        println!();
        println!("(includes demo data)");
    }

    Ok(())
}

fn print_metrics(m: &MetricSet) {
    println!("{:<26} {:>15.2}", "Revenue", m.revenue);
    println!("{:<26} {:>15}", "Orders", m.orders);
    println!("{:<26} {:>15}", "New customers", m.new_customers);
    println!("{:<26} {:>15.2}", "Ad spend", m.ad_spend);
    println!("{:<26} {:>15.2}", "AOV", m.aov);
    println!("{:<26} {:>14.2}%", "CTR", m.ctr);
    println!("{:<26} {:>15.2}", "CPC", m.cpc);
    println!("{:<26} {:>15.2}", "ROAS", m.roas);
    println!("{:<26} {:>15.2}", "CAC", m.cac);
    println!("{:<26} {:>14.2}%", "Gross margin", m.gross_margin);
    println!("{:<26} {:>14.2}%", "Net margin", m.net_margin);
    println!("{:<26} {:>14.2}%", "Delivery success rate", m.delivery_success_rate);
}
