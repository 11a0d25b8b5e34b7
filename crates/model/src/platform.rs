//! Platform and record-kind identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// External platforms Tally syncs from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Shopify storefront (orders, customers)
    Shopify,
    /// Meta Ads (campaign-day performance)
    MetaAds,
    /// Google Ads (campaign-day performance)
    GoogleAds,
    /// Shiprocket logistics (shipments)
    Shiprocket,
}

impl Platform {
    /// All platforms, in sync order
    pub const ALL: [Platform; 4] = [
        Platform::Shopify,
        Platform::MetaAds,
        Platform::GoogleAds,
        Platform::Shiprocket,
    ];

    /// Stable string identifier (config keys, table prefixes, logs)
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Shopify => "shopify",
            Platform::MetaAds => "meta_ads",
            Platform::GoogleAds => "google_ads",
            Platform::Shiprocket => "shiprocket",
        }
    }

    /// Record kinds this platform produces
    pub fn record_kinds(&self) -> &'static [RecordKind] {
        match self {
            Platform::Shopify => &[RecordKind::Order, RecordKind::Customer],
            Platform::MetaAds | Platform::GoogleAds => &[RecordKind::CampaignDay],
            Platform::Shiprocket => &[RecordKind::Shipment],
        }
    }

    /// Warehouse table for one of this platform's record kinds
    ///
    /// The table set is fixed: one table per platform entity.
    pub fn table(&self, kind: RecordKind) -> &'static str {
        match (self, kind) {
            (Platform::Shopify, RecordKind::Order) => "shopify_orders",
            (Platform::Shopify, RecordKind::Customer) => "shopify_customers",
            (Platform::MetaAds, RecordKind::CampaignDay) => "meta_campaigns",
            (Platform::GoogleAds, RecordKind::CampaignDay) => "google_campaigns",
            (Platform::Shiprocket, RecordKind::Shipment) => "shiprocket_shipments",
            // Kinds a platform does not produce map to its first table;
            // callers iterate `record_kinds()` so this is unreachable in
            // practice but keeps the function total.
            (p, _) => p.table(p.record_kinds()[0]),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a platform identifier
#[derive(Debug, Error)]
#[error("unknown platform: {0} (expected one of: shopify, meta_ads, google_ads, shiprocket)")]
pub struct PlatformParseError(pub String);

impl FromStr for Platform {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shopify" => Ok(Platform::Shopify),
            // Accept common aliases
            "meta_ads" | "meta" | "facebook" => Ok(Platform::MetaAds),
            "google_ads" | "google" => Ok(Platform::GoogleAds),
            "shiprocket" => Ok(Platform::Shiprocket),
            other => Err(PlatformParseError(other.to_string())),
        }
    }
}

/// Kinds of normalized records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// One storefront order
    Order,
    /// One storefront customer
    Customer,
    /// One ad campaign, one day
    CampaignDay,
    /// One shipment
    Shipment,
}

impl RecordKind {
    /// Stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Order => "order",
            RecordKind::Customer => "customer",
            RecordKind::CampaignDay => "campaign_day",
            RecordKind::Shipment => "shipment",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_roundtrip() {
        for p in Platform::ALL {
            assert_eq!(p.as_str().parse::<Platform>().unwrap(), p);
        }
    }

    #[test]
    fn test_platform_aliases() {
        assert_eq!("facebook".parse::<Platform>().unwrap(), Platform::MetaAds);
        assert_eq!("google".parse::<Platform>().unwrap(), Platform::GoogleAds);
        assert_eq!(" Shopify ".parse::<Platform>().unwrap(), Platform::Shopify);
    }

    #[test]
    fn test_unknown_platform() {
        assert!("amazon".parse::<Platform>().is_err());
    }

    #[test]
    fn test_tables_are_distinct() {
        let mut tables: Vec<&str> = Platform::ALL
            .iter()
            .flat_map(|p| p.record_kinds().iter().map(|k| p.table(*k)))
            .collect();
        tables.sort_unstable();
        let before = tables.len();
        tables.dedup();
        assert_eq!(before, tables.len());
    }
}
