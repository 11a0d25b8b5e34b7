//! Warehouse backend configuration

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Which warehouse backend to use
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseBackendType {
    /// In-memory store (development, tests)
    #[default]
    Memory,
    /// ClickHouse over its HTTP interface (production)
    ClickHouse,
}

/// Warehouse configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    /// Backend type
    pub backend: WarehouseBackendType,

    /// ClickHouse HTTP URL (e.g., "http://localhost:8123")
    pub url: Option<String>,

    /// Database name
    pub database: String,

    /// Username for authentication (optional)
    pub username: Option<String>,

    /// Password for authentication (optional)
    pub password: Option<String>,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            backend: WarehouseBackendType::Memory,
            url: None,
            database: "tally".into(),
            username: None,
            password: None,
        }
    }
}

impl WarehouseConfig {
    /// Check backend-specific requirements
    pub fn validate(&self) -> Result<()> {
        if self.backend == WarehouseBackendType::ClickHouse && self.url.is_none() {
            return Err(ConfigError::Validation(
                "warehouse.url is required for the clickhouse backend".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_needs_no_url() {
        WarehouseConfig::default().validate().unwrap();
    }

    #[test]
    fn test_clickhouse_requires_url() {
        let config = WarehouseConfig {
            backend: WarehouseBackendType::ClickHouse,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
