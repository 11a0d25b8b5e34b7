//! Query command - Execute SQL against the warehouse
//!
//! Read-only passthrough to the warehouse backend. Only SELECT and WITH
//! statements are accepted; the in-memory backend does not support SQL
//! and reports that.
//!
//! # Usage
//!
//! ```bash
//! tally query "SELECT count(*) FROM shopify_orders"
//! tally query "SELECT toDate(timestamp), sum(total_price) FROM shopify_orders FINAL GROUP BY 1" --format json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use tally_config::Config;
use tally_warehouse::QueryResult;

use crate::bootstrap;

/// Query command arguments
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// SQL query to execute (SELECT only)
    #[arg(value_name = "SQL")]
    pub sql: String,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the query command
pub async fn run(args: QueryArgs, config: Config) -> Result<()> {
    let warehouse = bootstrap::build_warehouse(&config)?;

    let result = warehouse
        .query(&args.sql)
        .await
        .context("query execution failed")?;

    output_result(&result, &args.format)?;

    eprintln!(
        "\n{} row(s) in {}ms [{}]",
        result.row_count,
        result.execution_time_ms,
        warehouse.name()
    );

    Ok(())
}

fn output_result(result: &QueryResult, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        "csv" => {
            println!("{}", result.column_names().join(","));
            for row in &result.rows {
                let values: Vec<String> = row.iter().map(value_str).collect();
                println!("{}", values.join(","));
            }
        }
        "table" => {
            if result.is_empty() {
                println!("(no data)");
                return Ok(());
            }

            // Column widths from the widest of header and values
            let names = result.column_names();
            let mut widths: Vec<usize> = names.iter().map(|n| n.len()).collect();
            for row in &result.rows {
                for (i, value) in row.iter().enumerate() {
                    widths[i] = widths[i].max(value_str(value).len());
                }
            }

            let header: Vec<String> = names
                .iter()
                .zip(&widths)
                .map(|(n, w)| format!("{:<width$}", n, width = w))
                .collect();
            println!("{}", header.join("  "));
            println!("{}", "-".repeat(widths.iter().sum::<usize>() + widths.len() * 2));

            for row in &result.rows {
                let line: Vec<String> = row
                    .iter()
                    .zip(&widths)
                    .map(|(v, w)| format!("{:<width$}", value_str(v), width = w))
                    .collect();
                println!("{}", line.join("  "));
            }
        }
        other => anyhow::bail!("invalid format '{}' (expected table, json, csv)", other),
    }
    Ok(())
}

fn value_str(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
