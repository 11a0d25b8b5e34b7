//! Tests for KPI formulas

use chrono::{Duration, Utc};

use tally_model::{fields, Platform, PlatformRecord, RecordKind};

use crate::kpi::{compute_metrics, derive, round2, Aggregates};
use crate::timerange::TimeRange;

fn week() -> TimeRange {
    TimeRange::parse("7d").unwrap()
}

fn order(id: &str, total: f64) -> PlatformRecord {
    PlatformRecord::new(Platform::Shopify, RecordKind::Order, id, 1, Utc::now())
        .with_field(fields::TOTAL_PRICE, total)
}

fn campaign_day(id: &str, spend: f64, impressions: f64, clicks: f64, value: f64) -> PlatformRecord {
    PlatformRecord::new(Platform::MetaAds, RecordKind::CampaignDay, id, 1, Utc::now())
        .with_field(fields::SPEND, spend)
        .with_field(fields::IMPRESSIONS, impressions)
        .with_field(fields::CLICKS, clicks)
        .with_field(fields::CONVERSION_VALUE, value)
}

fn shipment(id: &str, delivered: bool, charges: f64) -> PlatformRecord {
    PlatformRecord::new(Platform::Shiprocket, RecordKind::Shipment, id, 1, Utc::now())
        .with_field(fields::DELIVERED, if delivered { 1.0 } else { 0.0 })
        .with_field(fields::SHIPPING_CHARGES, charges)
}

#[test]
fn test_aov_basic() {
    let records = vec![order("1", 100.0), order("2", 200.0), order("3", 300.0)];
    let metrics = compute_metrics(&records, &week(), 0.40);

    assert_eq!(metrics.orders, 3);
    assert_eq!(metrics.revenue, 600.0);
    assert_eq!(metrics.aov, 200.0);
}

#[test]
fn test_aov_zero_orders() {
    let metrics = compute_metrics(&[], &week(), 0.40);
    assert_eq!(metrics.orders, 0);
    assert_eq!(metrics.aov, 0.0);
}

#[test]
fn test_roas_basic() {
    let records = vec![campaign_day("c1:2024-01-01", 500.0, 10_000.0, 250.0, 2000.0)];
    let metrics = compute_metrics(&records, &week(), 0.40);

    assert_eq!(metrics.roas, 4.0);
    // 250 clicks / 10000 impressions = 2.5%
    assert_eq!(metrics.ctr, 2.5);
    // 500 spend / 250 clicks
    assert_eq!(metrics.cpc, 2.0);
}

#[test]
fn test_roas_zero_spend() {
    // Conversion value present but no spend must not divide by zero
    let records = vec![campaign_day("c1:2024-01-01", 0.0, 0.0, 0.0, 2000.0)];
    let metrics = compute_metrics(&records, &week(), 0.40);

    assert_eq!(metrics.roas, 0.0);
    assert_eq!(metrics.ctr, 0.0);
    assert_eq!(metrics.cpc, 0.0);
}

#[test]
fn test_cac() {
    let now = Utc::now();
    let mut records = vec![campaign_day("c1:2024-01-01", 300.0, 1000.0, 50.0, 0.0)];
    for i in 0..3 {
        records.push(PlatformRecord::new(
            Platform::Shopify,
            RecordKind::Customer,
            format!("cust-{}", i),
            1,
            now,
        ));
    }

    let metrics = compute_metrics(&records, &week(), 0.40);
    assert_eq!(metrics.new_customers, 3);
    assert_eq!(metrics.cac, 100.0);
}

#[test]
fn test_margins() {
    // revenue 1000, cogs 400, spend 100, shipping 50
    let records = vec![
        order("1", 1000.0),
        campaign_day("c1:d", 100.0, 0.0, 0.0, 0.0),
        shipment("s1", true, 50.0),
    ];
    let metrics = compute_metrics(&records, &week(), 0.40);

    // (1000 - 400) / 1000 = 60%
    assert_eq!(metrics.gross_margin, 60.0);
    // (1000 - 550) / 1000 = 45%
    assert_eq!(metrics.net_margin, 45.0);
}

#[test]
fn test_margins_zero_revenue() {
    let records = vec![campaign_day("c1:d", 100.0, 0.0, 0.0, 0.0)];
    let metrics = compute_metrics(&records, &week(), 0.40);

    assert_eq!(metrics.gross_margin, 0.0);
    assert_eq!(metrics.net_margin, 0.0);
}

#[test]
fn test_delivery_success_rate() {
    let records = vec![
        shipment("s1", true, 10.0),
        shipment("s2", true, 10.0),
        shipment("s3", false, 10.0),
        shipment("s4", false, 10.0),
    ];
    let metrics = compute_metrics(&records, &week(), 0.40);

    assert_eq!(metrics.delivery_success_rate, 50.0);
}

#[test]
fn test_delivery_rate_zero_shipments() {
    let metrics = compute_metrics(&[], &week(), 0.40);
    assert_eq!(metrics.delivery_success_rate, 0.0);
}

#[test]
fn test_window_filtering() {
    let window = TimeRange::parse("7d").unwrap();
    let outside = window.start - Duration::days(2);

    let records = vec![
        order("in", 100.0),
        PlatformRecord::new(Platform::Shopify, RecordKind::Order, "out", 1, outside)
            .with_field(fields::TOTAL_PRICE, 900.0),
    ];

    let metrics = compute_metrics(&records, &window, 0.40);
    assert_eq!(metrics.orders, 1);
    assert_eq!(metrics.revenue, 100.0);
}

#[test]
fn test_demo_taint_propagates() {
    let records = vec![order("1", 100.0), order("2", 200.0).demo()];
    let metrics = compute_metrics(&records, &week(), 0.40);
    assert!(metrics.is_demo_data);

    let clean = vec![order("1", 100.0)];
    assert!(!compute_metrics(&clean, &week(), 0.40).is_demo_data);
}

#[test]
fn test_rounding_policy() {
    let agg = Aggregates {
        revenue: 100.0,
        orders: 3,
        ..Default::default()
    };
    let metrics = derive(&agg, 0.40);
    // 100/3 = 33.333... rounds to 33.33
    assert_eq!(metrics.aov, 33.33);
}

#[test]
fn test_round2() {
    assert_eq!(round2(1.005), 1.0); // f64 representation of 1.005 is just below
    assert_eq!(round2(2.675), 2.68);
    assert_eq!(round2(33.335), 33.34);
    assert_eq!(round2(-1.234), -1.23);
    assert_eq!(round2(0.0), 0.0);
}

#[test]
fn test_cod_charges_count_as_shipping() {
    let now = Utc::now();
    let records = vec![
        order("1", 1000.0),
        PlatformRecord::new(Platform::Shiprocket, RecordKind::Shipment, "s1", 1, now)
            .with_field(fields::DELIVERED, 1.0)
            .with_field(fields::SHIPPING_CHARGES, 30.0)
            .with_field(fields::COD_CHARGES, 20.0),
    ];
    let metrics = compute_metrics(&records, &week(), 0.40);

    // (1000 - 400 - 50) / 1000 = 55%
    assert_eq!(metrics.net_margin, 55.0);
}
