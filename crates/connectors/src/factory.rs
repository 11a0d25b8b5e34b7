//! Connector construction
//!
//! Builds a fresh connector (with its own HTTP client) from stored
//! credential JSON. Called once per platform per sync pass; connectors
//! never outlive the pass that built them.

use serde_json::Value;

use tally_model::Platform;

use crate::config::{GoogleAdsConfig, MetaAdsConfig, ShiprocketConfig, ShopifyConfig};
use crate::error::Result;
use crate::google_ads::GoogleAds;
use crate::meta_ads::MetaAds;
use crate::shiprocket::Shiprocket;
use crate::shopify::Shopify;
use crate::traits::Connector;

/// Build the connector for a platform from credential JSON
pub fn build(
    platform: Platform,
    credentials: &Value,
    workspace_id: u32,
) -> Result<Box<dyn Connector>> {
    Ok(match platform {
        Platform::Shopify => Box::new(Shopify::new(
            ShopifyConfig::from_json(credentials)?,
            workspace_id,
        )?),
        Platform::MetaAds => Box::new(MetaAds::new(
            MetaAdsConfig::from_json(credentials)?,
            workspace_id,
        )?),
        Platform::GoogleAds => Box::new(GoogleAds::new(
            GoogleAdsConfig::from_json(credentials)?,
            workspace_id,
        )?),
        Platform::Shiprocket => Box::new(Shiprocket::new(
            ShiprocketConfig::from_json(credentials)?,
            workspace_id,
        )?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConnectorError;
    use serde_json::json;

    #[test]
    fn test_build_with_credentials() {
        let connector = build(
            Platform::Shopify,
            &json!({"store": "x.myshopify.com", "access_token": "shpat"}),
            1,
        )
        .unwrap();
        assert_eq!(connector.platform(), Platform::Shopify);
    }

    #[test]
    fn test_build_without_credentials_is_not_configured() {
        for platform in Platform::ALL {
            let err = build(platform, &json!({}), 1).err().unwrap();
            assert!(
                matches!(err, ConnectorError::NotConfigured(_)),
                "{:?} gave {:?}",
                platform,
                err
            );
        }
    }
}
