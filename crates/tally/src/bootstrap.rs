//! Shared wiring for the CLI commands
//!
//! Every command needs some subset of: the parsed config file, a
//! warehouse backend, and the control store. The helpers here build
//! those the same way regardless of which command asked.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use tally_config::{Config, WarehouseBackendType};
use tally_control::{ControlStore, PlatformConfig};
use tally_model::Platform;
use tally_warehouse::{ClickHouseConfig, ClickHouseWarehouse, MemoryWarehouse, Warehouse};

/// Load the config file, falling back to default paths then defaults
///
/// An explicitly passed path must exist; the default paths are optional.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        if !path.exists() {
            anyhow::bail!("config file not found: {}", path.display());
        }
        return Config::from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()));
    }

    for candidate in ["configs/config.toml", "config.toml"] {
        if Path::new(candidate).exists() {
            return Config::from_file(candidate)
                .with_context(|| format!("failed to load config: {}", candidate));
        }
    }

    Ok(Config::default())
}

/// Build the warehouse backend named by the config
pub fn build_warehouse(config: &Config) -> Result<Arc<dyn Warehouse>> {
    let warehouse: Arc<dyn Warehouse> = match config.warehouse.backend {
        WarehouseBackendType::Memory => Arc::new(MemoryWarehouse::new()),
        WarehouseBackendType::ClickHouse => {
            let url = config
                .warehouse
                .url
                .as_deref()
                .context("warehouse.url is required for the clickhouse backend")?;
            let mut ch = ClickHouseConfig::new(url, config.warehouse.database.clone());
            if let (Some(user), Some(pass)) =
                (&config.warehouse.username, &config.warehouse.password)
            {
                ch = ch.with_credentials(user, pass);
            }
            Arc::new(ClickHouseWarehouse::new(&ch))
        }
    };

    info!(backend = warehouse.name(), "Warehouse backend ready");
    Ok(warehouse)
}

/// Open the control store under the configured data directory
pub async fn open_control(config: &Config) -> Result<Arc<ControlStore>> {
    let store = ControlStore::new(config.global.data_dir.clone())
        .await
        .context("failed to open control store")?;
    Ok(Arc::new(store))
}

/// Seed the control store from the `[connectors]` config sections
///
/// Upserts one platform config per connector entry. Returns the number
/// of entries written.
pub async fn seed_connectors(config: &Config, control: &ControlStore) -> Result<usize> {
    let mut seeded = 0;

    for (name, raw) in config.connectors.iter() {
        let platform: Platform = raw
            .connector_type
            .parse()
            .map_err(|e| anyhow::anyhow!("connector '{}': {}", name, e))?;

        let credentials = toml_to_json(raw.config.clone());
        let mut platform_config = PlatformConfig::new(raw.workspace_id, platform, credentials);
        platform_config.enabled = raw.enabled;

        control
            .platform_configs()
            .upsert(&platform_config)
            .await
            .with_context(|| format!("failed to store connector '{}'", name))?;

        info!(
            connector = %name,
            platform = %platform,
            workspace_id = raw.workspace_id,
            enabled = raw.enabled,
            "Connector credentials stored"
        );
        seeded += 1;
    }

    Ok(seeded)
}

/// Workspaces the config file mentions, for the serve scheduler loop
pub fn config_workspaces(config: &Config) -> Vec<u32> {
    let mut ids: Vec<u32> = config.connectors.iter().map(|(_, c)| c.workspace_id).collect();
    if ids.is_empty() {
        ids.push(1);
    }
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Convert a TOML value into the JSON credential format the connectors parse
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::Value::from(i),
        toml::Value::Float(f) => serde_json::Value::from(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
