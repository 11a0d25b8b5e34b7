//! Tally - Commerce analytics backend
//!
//! # Usage
//!
//! ```bash
//! # Run the server (default)
//! tally
//! tally --config configs/config.toml
//!
//! # One-shot sync pass
//! tally sync
//! tally sync --platform shopify --force
//!
//! # Read KPIs out of the warehouse
//! tally metrics --range 30d
//! tally metrics --range mtd --by-platform
//! ```

mod bootstrap;
mod cmd;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tally_config::LogFormat;

/// Tally - Commerce analytics backend
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    // Global args that apply to serve when no subcommand given
    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the sync server
    Serve(cmd::serve::ServeArgs),

    /// Run one sync pass and exit
    Sync(cmd::sync::SyncArgs),

    /// Compute KPIs over a time range
    Metrics(cmd::metrics::MetricsArgs),

    /// Show platform connections and recent sync passes
    Status(cmd::status::StatusArgs),

    /// Execute a SQL query against the warehouse
    Query(cmd::query::QueryArgs),

    /// Seed the control store from the config file connectors
    Init(cmd::init::InitArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Serve(mut args)) => {
            if args.config.is_none() && cli.config.is_some() {
                args.config = cli.config;
            }
            let config = bootstrap::load_config(args.config.as_deref())?;
            init_logging(&config, cli.log_level.as_deref())?;
            cmd::serve::run(args, config).await
        }
        Some(Command::Sync(mut args)) => {
            if args.config.is_none() && cli.config.is_some() {
                args.config = cli.config;
            }
            let config = bootstrap::load_config(args.config.as_deref())?;
            init_logging(&config, cli.log_level.as_deref())?;
            cmd::sync::run(args, config).await
        }
        Some(Command::Metrics(mut args)) => {
            if args.config.is_none() && cli.config.is_some() {
                args.config = cli.config;
            }
            let config = bootstrap::load_config(args.config.as_deref())?;
            // Metrics output goes to stdout; keep logging to warnings
            init_logging_level(&config, cli.log_level.as_deref().unwrap_or("warn"))?;
            cmd::metrics::run(args, config).await
        }
        Some(Command::Status(mut args)) => {
            if args.config.is_none() && cli.config.is_some() {
                args.config = cli.config;
            }
            let config = bootstrap::load_config(args.config.as_deref())?;
            init_logging_level(&config, cli.log_level.as_deref().unwrap_or("warn"))?;
            cmd::status::run(args, config).await
        }
        Some(Command::Query(mut args)) => {
            if args.config.is_none() && cli.config.is_some() {
                args.config = cli.config;
            }
            let config = bootstrap::load_config(args.config.as_deref())?;
            init_logging_level(&config, cli.log_level.as_deref().unwrap_or("warn"))?;
            cmd::query::run(args, config).await
        }
        Some(Command::Init(mut args)) => {
            if args.config.is_none() && cli.config.is_some() {
                args.config = cli.config;
            }
            let config = bootstrap::load_config(args.config.as_deref())?;
            init_logging(&config, cli.log_level.as_deref())?;
            cmd::init::run(args, config).await
        }
        // No subcommand = run server (default behavior)
        None => {
            let config = bootstrap::load_config(cli.config.as_deref())?;
            init_logging(&config, cli.log_level.as_deref())?;
            let args = cmd::serve::ServeArgs { config: None };
            cmd::serve::run(args, config).await
        }
    }
}

/// Initialize tracing from the config `[log]` section, with an optional
/// CLI level override
fn init_logging(config: &tally_config::Config, override_level: Option<&str>) -> Result<()> {
    let level = override_level.unwrap_or(config.log.level.as_str());
    init_logging_level(config, level)
}

fn init_logging_level(config: &tally_config::Config, level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.log.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Console => registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init(),
    }

    Ok(())
}
