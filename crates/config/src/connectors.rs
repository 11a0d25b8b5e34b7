//! Connector configuration
//!
//! Generic configuration for the platform connectors. Connector-specific
//! keys stay as raw TOML here; the connectors crate parses them into
//! typed configs.
//!
//! # Example
//!
//! ```toml
//! [connectors.shopify_main]
//! type = "shopify"
//! store = "mystore.myshopify.com"
//! access_token = "shpat_xxx"
//!
//! [connectors.google_main]
//! type = "google_ads"
//! customer_id = "123-456-7890"
//! workspace_id = 2
//! ```

use serde::Deserialize;
use std::collections::HashMap;

/// Connector types Tally ships with
pub const KNOWN_CONNECTOR_TYPES: &[&str] =
    &["shopify", "meta_ads", "google_ads", "shiprocket"];

/// Container for all connector configurations
///
/// Connectors are stored as a map of name -> raw config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConnectorsConfig {
    /// Named connector instances
    #[serde(flatten)]
    connectors: HashMap<String, RawConnectorConfig>,
}

impl ConnectorsConfig {
    /// Get a connector config by name
    pub fn get(&self, name: &str) -> Option<&RawConnectorConfig> {
        self.connectors.get(name)
    }

    /// Iterate over all connectors
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawConnectorConfig)> {
        self.connectors.iter()
    }

    /// Get the number of configured connectors
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    /// Check if no connectors are configured
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// Get connectors filtered by type
    pub fn by_type<'a>(
        &'a self,
        connector_type: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a RawConnectorConfig)> + 'a {
        self.connectors
            .iter()
            .filter(move |(_, c)| c.connector_type == connector_type)
    }
}

/// Raw connector configuration
///
/// Contains the connector type and raw config values.
/// Each connector implementation parses its specific config from `config`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConnectorConfig {
    /// Connector type (e.g., "shopify", "google_ads")
    #[serde(rename = "type")]
    pub connector_type: String,

    /// Whether this connector is enabled
    /// Default: true
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Tenant this connector syncs into
    /// Default: 1
    #[serde(default = "default_workspace")]
    pub workspace_id: u32,

    /// Raw connector-specific configuration
    /// Parsed by the connector implementation
    #[serde(flatten)]
    pub config: toml::Value,
}

fn default_enabled() -> bool {
    true
}

fn default_workspace() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connectors() {
        let toml_str = r#"
[shopify_main]
type = "shopify"
store = "mystore.myshopify.com"

[google_main]
type = "google_ads"
enabled = false
workspace_id = 2
"#;
        let config: ConnectorsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.len(), 2);

        let shopify = config.get("shopify_main").unwrap();
        assert_eq!(shopify.connector_type, "shopify");
        assert!(shopify.enabled);
        assert_eq!(shopify.workspace_id, 1);
        assert_eq!(
            shopify.config.get("store").and_then(|v| v.as_str()),
            Some("mystore.myshopify.com")
        );

        let google = config.get("google_main").unwrap();
        assert!(!google.enabled);
        assert_eq!(google.workspace_id, 2);
    }

    #[test]
    fn test_by_type() {
        let toml_str = r#"
[a]
type = "shopify"

[b]
type = "shopify"

[c]
type = "shiprocket"
"#;
        let config: ConnectorsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.by_type("shopify").count(), 2);
        assert_eq!(config.by_type("shiprocket").count(), 1);
        assert_eq!(config.by_type("meta_ads").count(), 0);
    }
}
