//! Typed credential configs for each platform
//!
//! Credentials live in the control store as opaque JSON; each connector
//! parses its own shape out of that JSON at construction time. Missing
//! required fields surface as `NotConfigured`, which the orchestrator
//! treats as "use demo data" when the fallback is enabled.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConnectorError, Result};

/// Shopify Admin API credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyConfig {
    /// Store domain (e.g., mystore.myshopify.com)
    pub store: String,
    /// Admin API access token
    pub access_token: String,
    /// API version
    #[serde(default = "default_shopify_api_version")]
    pub api_version: String,
}

fn default_shopify_api_version() -> String {
    "2024-01".to_string()
}

impl ShopifyConfig {
    /// Parse from stored credential JSON
    pub fn from_json(value: &Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value.clone())
            .map_err(|e| ConnectorError::NotConfigured(format!("shopify: {}", e)))?;
        if config.store.is_empty() || config.access_token.is_empty() {
            return Err(ConnectorError::NotConfigured(
                "shopify: store and access_token are required".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Meta Marketing API credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaAdsConfig {
    /// Ad account id, without the `act_` prefix
    pub ad_account_id: String,
    /// Long-lived access token
    pub access_token: String,
    /// Graph API version
    #[serde(default = "default_meta_api_version")]
    pub api_version: String,
}

fn default_meta_api_version() -> String {
    "v19.0".to_string()
}

impl MetaAdsConfig {
    /// Parse from stored credential JSON
    pub fn from_json(value: &Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value.clone())
            .map_err(|e| ConnectorError::NotConfigured(format!("meta_ads: {}", e)))?;
        if config.ad_account_id.is_empty() || config.access_token.is_empty() {
            return Err(ConnectorError::NotConfigured(
                "meta_ads: ad_account_id and access_token are required".to_string(),
            ));
        }
        Ok(config)
    }
}

/// Google Ads API credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleAdsConfig {
    /// Ads customer id (digits only)
    pub customer_id: String,
    /// Developer token
    pub developer_token: String,
    /// OAuth access token
    pub access_token: String,
    /// API version
    #[serde(default = "default_google_api_version")]
    pub api_version: String,
}

fn default_google_api_version() -> String {
    "v16".to_string()
}

impl GoogleAdsConfig {
    /// Parse from stored credential JSON
    pub fn from_json(value: &Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value.clone())
            .map_err(|e| ConnectorError::NotConfigured(format!("google_ads: {}", e)))?;
        if config.customer_id.is_empty()
            || config.developer_token.is_empty()
            || config.access_token.is_empty()
        {
            return Err(ConnectorError::NotConfigured(
                "google_ads: customer_id, developer_token, and access_token are required"
                    .to_string(),
            ));
        }
        Ok(config)
    }
}

/// Shiprocket API credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiprocketConfig {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl ShiprocketConfig {
    /// Parse from stored credential JSON
    pub fn from_json(value: &Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value.clone())
            .map_err(|e| ConnectorError::NotConfigured(format!("shiprocket: {}", e)))?;
        if config.email.is_empty() || config.password.is_empty() {
            return Err(ConnectorError::NotConfigured(
                "shiprocket: email and password are required".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shopify_config_parse() {
        let config = ShopifyConfig::from_json(&json!({
            "store": "demo.myshopify.com",
            "access_token": "shpat_xxx",
        }))
        .unwrap();
        assert_eq!(config.store, "demo.myshopify.com");
        assert_eq!(config.api_version, "2024-01");
    }

    #[test]
    fn test_shopify_config_missing_token() {
        let err = ShopifyConfig::from_json(&json!({
            "store": "demo.myshopify.com",
            "access_token": "",
        }))
        .unwrap_err();
        assert!(matches!(err, ConnectorError::NotConfigured(_)));
    }

    #[test]
    fn test_meta_config_missing_field() {
        let err = MetaAdsConfig::from_json(&json!({"access_token": "tok"})).unwrap_err();
        assert!(matches!(err, ConnectorError::NotConfigured(_)));
    }

    #[test]
    fn test_google_config_parse() {
        let config = GoogleAdsConfig::from_json(&json!({
            "customer_id": "1234567890",
            "developer_token": "dev",
            "access_token": "tok",
        }))
        .unwrap();
        assert_eq!(config.api_version, "v16");
    }

    #[test]
    fn test_shiprocket_config_parse() {
        let config = ShiprocketConfig::from_json(&json!({
            "email": "ops@example.com",
            "password": "hunter2",
        }))
        .unwrap();
        assert_eq!(config.email, "ops@example.com");

        let err = ShiprocketConfig::from_json(&json!({})).unwrap_err();
        assert!(matches!(err, ConnectorError::NotConfigured(_)));
    }
}
