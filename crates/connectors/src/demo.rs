//! Deterministic demo data
//!
//! When a platform has no credentials and the demo fallback is enabled,
//! the orchestrator writes these records instead of fetching. Values are
//! arithmetic progressions, so repeated generation produces the same
//! external ids and the upsert path keeps the warehouse stable. Every
//! record carries `is_demo = true`; nothing here ever masquerades as
//! real data.

use chrono::{DateTime, Duration, Utc};

use tally_model::{fields, Platform, PlatformRecord, RecordKind};

const DEMO_ORDERS: usize = 100;
const DEMO_CUSTOMERS: usize = 20;
const DEMO_META_CAMPAIGN_DAYS: usize = 10;
const DEMO_GOOGLE_CAMPAIGN_DAYS: usize = 8;
const DEMO_SHIPMENTS: usize = 80;

const COURIERS: &[&str] = &["Shiprocket", "Delhivery", "BlueDart", "DTDC"];
const SHIPMENT_STATUSES: &[&str] = &["delivered", "in_transit", "picked_up", "delivered"];

/// Generate all demo records for one platform, anchored at `now`
pub fn demo_records(
    platform: Platform,
    workspace_id: u32,
    now: DateTime<Utc>,
) -> Vec<PlatformRecord> {
    match platform {
        Platform::Shopify => {
            let mut records = demo_orders(workspace_id, now);
            records.extend(demo_customers(workspace_id, now));
            records
        }
        Platform::MetaAds => demo_meta_campaigns(workspace_id, now),
        Platform::GoogleAds => demo_google_campaigns(workspace_id, now),
        Platform::Shiprocket => demo_shipments(workspace_id, now),
    }
}

fn demo_orders(workspace_id: u32, now: DateTime<Utc>) -> Vec<PlatformRecord> {
    (0..DEMO_ORDERS)
        .map(|i| {
            let created = now - Duration::days((i % 30) as i64);
            PlatformRecord::new(
                Platform::Shopify,
                RecordKind::Order,
                format!("demo_order_{}", i),
                workspace_id,
                created,
            )
            .with_field(fields::TOTAL_PRICE, 50.0 + (i % 500) as f64)
            .with_field(fields::SUBTOTAL_PRICE, 45.0 + (i % 450) as f64)
            .with_field(fields::TOTAL_TAX, 5.0 + (i % 50) as f64)
            .with_label(fields::CURRENCY, "INR")
            .with_label(
                fields::FINANCIAL_STATUS,
                if i % 10 != 0 { "paid" } else { "pending" },
            )
            .with_label(
                fields::FULFILLMENT_STATUS,
                if i % 8 != 0 { "fulfilled" } else { "pending" },
            )
            .demo()
        })
        .collect()
}

fn demo_customers(workspace_id: u32, now: DateTime<Utc>) -> Vec<PlatformRecord> {
    (0..DEMO_CUSTOMERS)
        .map(|i| {
            let created = now - Duration::days((i * 5) as i64);
            PlatformRecord::new(
                Platform::Shopify,
                RecordKind::Customer,
                format!("demo_customer_{}", i),
                workspace_id,
                created,
            )
            .with_field(fields::ORDERS_COUNT, (1 + i % 10) as f64)
            .with_field(fields::TOTAL_SPENT, 100.0 + (i * 50) as f64)
            .demo()
        })
        .collect()
}

fn demo_meta_campaigns(workspace_id: u32, now: DateTime<Utc>) -> Vec<PlatformRecord> {
    (0..DEMO_META_CAMPAIGN_DAYS)
        .map(|i| {
            let day = now - Duration::days(i as i64);
            let spend = 1000.0 + (i * 200) as f64;
            let roas = 3.5 + i as f64 * 0.2;
            PlatformRecord::new(
                Platform::MetaAds,
                RecordKind::CampaignDay,
                format!("demo_fb_campaign_{}:{}", i, day.format("%Y-%m-%d")),
                workspace_id,
                day,
            )
            .with_field(fields::SPEND, spend)
            .with_field(fields::IMPRESSIONS, (10_000 + i * 2_000) as f64)
            .with_field(fields::CLICKS, (500 + i * 100) as f64)
            .with_field(fields::CONVERSIONS, (25 + i * 5) as f64)
            .with_field(fields::CONVERSION_VALUE, spend * roas)
            .with_label(fields::CAMPAIGN_NAME, format!("Demo Campaign {}", i))
            .with_label(fields::STATUS, "ACTIVE")
            .demo()
        })
        .collect()
}

fn demo_google_campaigns(workspace_id: u32, now: DateTime<Utc>) -> Vec<PlatformRecord> {
    (0..DEMO_GOOGLE_CAMPAIGN_DAYS)
        .map(|i| {
            let day = now - Duration::days(i as i64);
            let spend = 800.0 + (i * 150) as f64;
            let conversions = 20.0 + (i * 3) as f64;
            PlatformRecord::new(
                Platform::GoogleAds,
                RecordKind::CampaignDay,
                format!("demo_google_campaign_{}:{}", i, day.format("%Y-%m-%d")),
                workspace_id,
                day,
            )
            .with_field(fields::SPEND, spend)
            .with_field(fields::IMPRESSIONS, (8_000 + i * 1_500) as f64)
            .with_field(fields::CLICKS, (400 + i * 80) as f64)
            .with_field(fields::CONVERSIONS, conversions)
            .with_field(fields::CONVERSION_VALUE, conversions * (35.0 + (i * 5) as f64))
            .with_label(fields::CAMPAIGN_NAME, format!("Demo Google Campaign {}", i))
            .with_label(fields::STATUS, "ENABLED")
            .demo()
        })
        .collect()
}

fn demo_shipments(workspace_id: u32, now: DateTime<Utc>) -> Vec<PlatformRecord> {
    (0..DEMO_SHIPMENTS)
        .map(|i| {
            let pickup = now - Duration::days((i % 20) as i64);
            let status = SHIPMENT_STATUSES[i % SHIPMENT_STATUSES.len()];
            let cod = if i % 3 == 0 {
                20.0 + (i % 30) as f64
            } else {
                0.0
            };
            PlatformRecord::new(
                Platform::Shiprocket,
                RecordKind::Shipment,
                format!("demo_shipment_{}", i),
                workspace_id,
                pickup,
            )
            .with_field(fields::WEIGHT, 0.5 + (i % 5) as f64)
            .with_field(fields::SHIPPING_CHARGES, 50.0 + (i % 100) as f64)
            .with_field(fields::COD_CHARGES, cod)
            .with_field(
                fields::DELIVERED,
                if status == "delivered" { 1.0 } else { 0.0 },
            )
            .with_label(fields::STATUS, status)
            .with_label(fields::COURIER, COURIERS[i % COURIERS.len()])
            .demo()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_platform() {
        let now = Utc::now();
        assert_eq!(demo_records(Platform::Shopify, 1, now).len(), 120);
        assert_eq!(demo_records(Platform::MetaAds, 1, now).len(), 10);
        assert_eq!(demo_records(Platform::GoogleAds, 1, now).len(), 8);
        assert_eq!(demo_records(Platform::Shiprocket, 1, now).len(), 80);
    }

    #[test]
    fn test_every_record_is_demo() {
        let now = Utc::now();
        for platform in Platform::ALL {
            for record in demo_records(platform, 1, now) {
                assert!(record.is_demo, "{} record not flagged", record.external_id);
            }
        }
    }

    #[test]
    fn test_deterministic_external_ids() {
        let now = Utc::now();
        let a = demo_records(Platform::Shiprocket, 1, now);
        let b = demo_records(Platform::Shiprocket, 1, now);
        let ids_a: Vec<_> = a.iter().map(|r| r.external_id.clone()).collect();
        let ids_b: Vec<_> = b.iter().map(|r| r.external_id.clone()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_delivered_matches_status() {
        let now = Utc::now();
        for record in demo_records(Platform::Shiprocket, 1, now) {
            let delivered = record.field(fields::DELIVERED) > 0.0;
            let status = record.labels.get(fields::STATUS).unwrap();
            assert_eq!(delivered, status == "delivered");
        }
    }

    #[test]
    fn test_order_progression() {
        let now = Utc::now();
        let orders = demo_records(Platform::Shopify, 1, now);
        let first = orders.iter().find(|r| r.external_id == "demo_order_0").unwrap();
        assert_eq!(first.field(fields::TOTAL_PRICE), 50.0);
        let last = orders
            .iter()
            .find(|r| r.external_id == "demo_order_99")
            .unwrap();
        assert_eq!(last.field(fields::TOTAL_PRICE), 149.0);
    }
}
