//! Tests for record <-> row conversion

use chrono::{TimeZone, Utc};

use crate::fields;
use crate::platform::{Platform, RecordKind};
use crate::record::PlatformRecord;

fn sample_order() -> PlatformRecord {
    PlatformRecord::new(
        Platform::Shopify,
        RecordKind::Order,
        "451234",
        7,
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap(),
    )
    .with_field(fields::TOTAL_PRICE, 1499.0)
    .with_field(fields::TOTAL_TAX, 228.66)
    .with_label(fields::CURRENCY, "INR")
    .with_label(fields::FINANCIAL_STATUS, "paid")
}

#[test]
fn test_row_roundtrip() {
    let record = sample_order();
    let row = record.to_row();
    let back = PlatformRecord::from_row(&row).unwrap();

    assert_eq!(back.platform, Platform::Shopify);
    assert_eq!(back.kind, RecordKind::Order);
    assert_eq!(back.external_id, "451234");
    assert_eq!(back.workspace_id, 7);
    assert_eq!(back.timestamp, record.timestamp);
    assert_eq!(back.fields, record.fields);
    assert_eq!(back.labels, record.labels);
    assert!(!back.is_demo);
}

#[test]
fn test_demo_flag_survives_roundtrip() {
    let record = sample_order().demo();
    let row = record.to_row();
    assert_eq!(row.get("is_demo").unwrap().as_u64(), Some(1));

    let back = PlatformRecord::from_row(&row).unwrap();
    assert!(back.is_demo);
}

#[test]
fn test_row_has_upsert_columns() {
    let row = sample_order().to_row();
    // The warehouse orders the replacing merge tree by these
    assert!(row.contains_key("workspace_id"));
    assert!(row.contains_key("external_id"));
    assert!(row.contains_key("updated_at"));
}

#[test]
fn test_missing_field_defaults_to_zero() {
    let record = sample_order();
    assert_eq!(record.field(fields::SPEND), 0.0);
    assert_eq!(record.field(fields::TOTAL_PRICE), 1499.0);
}

#[test]
fn test_from_row_rejects_missing_columns() {
    let mut row = sample_order().to_row();
    row.remove("external_id");
    assert!(PlatformRecord::from_row(&row).is_err());
}

#[test]
fn test_table_routing() {
    assert_eq!(sample_order().table(), "shopify_orders");

    let shipment = PlatformRecord::new(
        Platform::Shiprocket,
        RecordKind::Shipment,
        "AWB1000001",
        1,
        Utc::now(),
    );
    assert_eq!(shipment.table(), "shiprocket_shipments");
}
