//! Read-only SQL guardrail

use crate::error::WarehouseError;

/// Validate SQL - only allow SELECT and WITH (CTE) queries
///
/// This is a guardrail to prevent accidental destructive queries from
/// the CLI passthrough. The operator is trusted (they have credentials),
/// so this is not a security boundary - just protection against
/// mistakes.
pub fn validate_sql(sql: &str) -> Result<(), WarehouseError> {
    // A trailing semicolon is fine; one in the middle means a second
    // statement is hiding behind the first
    let stmt = sql.trim().trim_end_matches(';').trim_end();
    if stmt.contains(';') {
        return Err(WarehouseError::InvalidSql(
            "multiple statements not allowed".to_string(),
        ));
    }

    let upper = stmt.to_uppercase();
    match upper.split_whitespace().next() {
        Some("SELECT") | Some("WITH") => {}
        _ => {
            return Err(WarehouseError::InvalidSql(
                "only SELECT and WITH queries are allowed".to_string(),
            ))
        }
    }

    // SELECT ... INTO creates tables in some databases
    if upper.contains(" INTO ") {
        return Err(WarehouseError::InvalidSql(
            "SELECT INTO is not allowed".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sql_select() {
        assert!(validate_sql("SELECT * FROM shopify_orders").is_ok());
        assert!(validate_sql("  SELECT count(*) FROM meta_campaigns  ").is_ok());
        assert!(validate_sql("select * from shopify_orders").is_ok());
    }

    #[test]
    fn test_validate_sql_with() {
        assert!(validate_sql("WITH cte AS (SELECT 1) SELECT * FROM cte").is_ok());
    }

    #[test]
    fn test_validate_sql_invalid() {
        assert!(validate_sql("INSERT INTO shopify_orders VALUES (1)").is_err());
        assert!(validate_sql("DELETE FROM shopify_orders").is_err());
        assert!(validate_sql("DROP TABLE shopify_orders").is_err());
        assert!(validate_sql("TRUNCATE TABLE meta_campaigns").is_err());
        assert!(validate_sql("ALTER TABLE x ADD COLUMN y Int64").is_err());
    }

    #[test]
    fn test_validate_sql_multiple_statements() {
        assert!(validate_sql("SELECT 1; DROP TABLE shopify_orders").is_err());
        assert!(validate_sql("SELECT 1; SELECT 2").is_err());
    }

    #[test]
    fn test_validate_sql_trailing_semicolon_ok() {
        assert!(validate_sql("SELECT * FROM shopify_orders;").is_ok());
    }

    #[test]
    fn test_validate_sql_select_into_blocked() {
        assert!(validate_sql("SELECT * INTO backup FROM shopify_orders").is_err());
    }

    #[test]
    fn test_validate_sql_subqueries_ok() {
        assert!(validate_sql(
            "SELECT * FROM shopify_orders WHERE external_id IN (SELECT order_id FROM x)"
        )
        .is_ok());
    }
}
