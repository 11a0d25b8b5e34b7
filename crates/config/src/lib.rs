//! Tally Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use tally_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[warehouse]\nbackend = \"memory\"").unwrap();
//! ```
//!
//! # Example Minimal Config
//!
//! ```toml
//! [warehouse]
//! backend = "clickhouse"
//! url = "http://localhost:8123"
//!
//! [connectors.shopify_main]
//! type = "shopify"
//! store = "mystore.myshopify.com"
//! access_token = "shpat_xxx"
//! ```

mod connectors;
mod error;
mod global;
mod logging;
mod sync;
mod warehouse;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use connectors::{ConnectorsConfig, RawConnectorConfig, KNOWN_CONNECTOR_TYPES};
pub use error::{ConfigError, Result};
pub use global::GlobalConfig;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use sync::SyncConfig;
pub use warehouse::{WarehouseBackendType, WarehouseConfig};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global settings (batch size, data directory)
    pub global: GlobalConfig,

    /// Logging configuration
    pub log: LogConfig,

    /// Warehouse backend (ClickHouse or in-memory)
    pub warehouse: WarehouseConfig,

    /// Sync pipeline settings (interval, pagination, demo fallback)
    pub sync: SyncConfig,

    /// Platform connectors (Shopify, Meta Ads, Google Ads, Shiprocket)
    pub connectors: ConnectorsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error for unknown connector types or inconsistent
    /// warehouse settings.
    pub fn validate(&self) -> Result<()> {
        for (name, connector) in self.connectors.iter() {
            if !KNOWN_CONNECTOR_TYPES.contains(&connector.connector_type.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "connector '{}' has unknown type '{}'",
                    name, connector.connector_type
                )));
            }
        }
        self.warehouse.validate()?;
        self.sync.validate()?;
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.sync.interval_secs, 3600);
        assert_eq!(config.global.batch_size, 500);
        assert!(config.connectors.is_empty());
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::from_str(
            r#"
[warehouse]
backend = "clickhouse"
url = "http://localhost:8123"

[connectors.shopify_main]
type = "shopify"
store = "mystore.myshopify.com"
"#,
        )
        .unwrap();

        assert_eq!(
            config.warehouse.backend,
            WarehouseBackendType::ClickHouse
        );
        assert_eq!(config.connectors.len(), 1);
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_connector_type_rejected() {
        let config = Config::from_str(
            r#"
[connectors.bad]
type = "amazon"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_str("[warehouse").is_err());
    }
}
