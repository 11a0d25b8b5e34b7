//! Fixed table schemas
//!
//! One table per platform entity. Every table shares the meta columns
//! (tenant, identity, timestamps, demo flag) and adds its own numeric
//! metric columns. Timestamps are stored as RFC 3339 strings in UTC,
//! which sort lexicographically, so range scans are plain string
//! comparisons on every backend.

use tally_model::{fields, Platform};

/// All warehouse tables, in creation order
pub const TABLES: &[&str] = &[
    "shopify_orders",
    "shopify_customers",
    "meta_campaigns",
    "google_campaigns",
    "shiprocket_shipments",
];

/// Check a table name against the fixed set
pub fn is_known_table(table: &str) -> bool {
    TABLES.contains(&table)
}

/// Numeric metric columns for a table
pub fn metric_columns(table: &str) -> &'static [&'static str] {
    match table {
        "shopify_orders" => &[
            fields::TOTAL_PRICE,
            fields::SUBTOTAL_PRICE,
            fields::TOTAL_TAX,
        ],
        "shopify_customers" => &[fields::TOTAL_SPENT, fields::ORDERS_COUNT],
        "meta_campaigns" | "google_campaigns" => &[
            fields::SPEND,
            fields::IMPRESSIONS,
            fields::CLICKS,
            fields::CONVERSIONS,
            fields::CONVERSION_VALUE,
        ],
        "shiprocket_shipments" => &[
            fields::WEIGHT,
            fields::SHIPPING_CHARGES,
            fields::COD_CHARGES,
            fields::DELIVERED,
        ],
        _ => &[],
    }
}

/// Tables that belong to one platform
pub fn tables_for(platform: Platform) -> Vec<&'static str> {
    platform
        .record_kinds()
        .iter()
        .map(|k| platform.table(*k))
        .collect()
}

/// ClickHouse DDL for a table
///
/// `ReplacingMergeTree(updated_at)` keyed on `(workspace_id,
/// external_id)` gives upsert-by-external-id semantics: the newest
/// version of a row wins at merge time, and reads use `FINAL`.
pub fn clickhouse_ddl(table: &str) -> String {
    let metrics: String = metric_columns(table)
        .iter()
        .map(|c| format!("    {} Float64,\n", c))
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n\
        \x20   workspace_id UInt32,\n\
        \x20   external_id String,\n\
        \x20   platform String,\n\
        \x20   kind String,\n\
        \x20   timestamp String,\n\
        {metrics}\
        \x20   labels String,\n\
        \x20   is_demo UInt8,\n\
        \x20   updated_at String\n\
        ) ENGINE = ReplacingMergeTree(updated_at)\n\
        ORDER BY (workspace_id, external_id)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_has_metric_columns() {
        for table in TABLES {
            assert!(
                !metric_columns(table).is_empty(),
                "no metric columns for {}",
                table
            );
        }
    }

    #[test]
    fn test_platform_tables_are_known() {
        for platform in Platform::ALL {
            for table in tables_for(platform) {
                assert!(is_known_table(table), "{} not in TABLES", table);
            }
        }
    }

    #[test]
    fn test_ddl_shape() {
        let ddl = clickhouse_ddl("meta_campaigns");
        assert!(ddl.contains("CREATE TABLE IF NOT EXISTS meta_campaigns"));
        assert!(ddl.contains("spend Float64"));
        assert!(ddl.contains("ReplacingMergeTree(updated_at)"));
        assert!(ddl.contains("ORDER BY (workspace_id, external_id)"));
    }

    #[test]
    fn test_unknown_table() {
        assert!(!is_known_table("events_v1"));
        assert!(metric_columns("events_v1").is_empty());
    }
}
