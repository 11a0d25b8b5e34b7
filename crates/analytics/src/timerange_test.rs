//! Tests for time range parsing

use chrono::{Datelike, Duration, Utc};

use crate::timerange::TimeRange;

#[test]
fn test_parse_relative_days() {
    let range = TimeRange::parse("7d").unwrap();
    assert_eq!(range.days(), 7);

    let range = TimeRange::parse("30d").unwrap();
    assert_eq!(range.days(), 30);

    let range = TimeRange::parse("90d").unwrap();
    assert_eq!(range.days(), 90);
}

#[test]
fn test_parse_relative_hours() {
    let range = TimeRange::parse("24h").unwrap();
    assert_eq!(range.end - range.start, Duration::hours(24));

    let range = TimeRange::parse("1h").unwrap();
    assert_eq!(range.end - range.start, Duration::hours(1));
}

#[test]
fn test_parse_relative_years() {
    let range = TimeRange::parse("1y").unwrap();
    assert_eq!(range.days(), 365);
}

#[test]
fn test_parse_predefined_today() {
    let range = TimeRange::parse("today").unwrap();
    let now = Utc::now();
    assert_eq!(range.start.date_naive(), now.date_naive());
    assert_eq!(range.end.date_naive(), now.date_naive());
}

#[test]
fn test_parse_predefined_yesterday() {
    let range = TimeRange::parse("yesterday").unwrap();
    let yesterday = Utc::now() - Duration::days(1);
    assert_eq!(range.start.date_naive(), yesterday.date_naive());
    assert_eq!(range.end.date_naive(), yesterday.date_naive());
}

#[test]
fn test_parse_case_insensitive() {
    assert!(TimeRange::parse("TODAY").is_ok());
    assert!(TimeRange::parse("Today").is_ok());
    assert!(TimeRange::parse("7D").is_ok());
}

#[test]
fn test_parse_custom_range() {
    let range = TimeRange::parse("2025-03-01,2025-03-15").unwrap();
    assert_eq!(range.start.format("%Y-%m-%d").to_string(), "2025-03-01");
    assert_eq!(range.end.format("%Y-%m-%d").to_string(), "2025-03-15");
    // Mar 1-15 inclusive
    assert_eq!(range.days(), 15);
}

#[test]
fn test_parse_custom_range_with_spaces() {
    let range = TimeRange::parse("  2025-03-01 , 2025-03-15  ").unwrap();
    assert_eq!(range.days(), 15);
}

#[test]
fn test_parse_custom_range_rejects_inverted() {
    assert!(TimeRange::parse("2025-03-15,2025-03-01").is_err());
}

#[test]
fn test_parse_invalid() {
    assert!(TimeRange::parse("invalid").is_err());
    assert!(TimeRange::parse("").is_err());
    assert!(TimeRange::parse("0d").is_err());
    assert!(TimeRange::parse("-7d").is_err());
    assert!(TimeRange::parse("2025-13-01,2025-13-31").is_err());
}

#[test]
fn test_previous_period() {
    let range = TimeRange::parse("7d").unwrap();
    let prev = range.previous_period();

    // Same duration, ending before the current period starts
    assert_eq!(prev.days(), range.days());
    assert!(prev.end < range.start);
}

#[test]
fn test_contains() {
    let range = TimeRange::parse("2025-03-01,2025-03-15").unwrap();
    assert!(range.contains(range.start));
    assert!(range.contains(range.end));
    assert!(!range.contains(range.end + Duration::seconds(1)));
    assert!(!range.contains(range.start - Duration::seconds(1)));
}

#[test]
fn test_new_validates_order() {
    let now = Utc::now();
    let yesterday = now - Duration::days(1);

    assert!(TimeRange::new(yesterday, now).is_ok());
    assert!(TimeRange::new(now, yesterday).is_err());
}

#[test]
fn test_mtd_starts_at_first_of_month() {
    let range = TimeRange::parse("mtd").unwrap();
    assert_eq!(range.start.day(), 1);
}

#[test]
fn test_ytd_starts_at_jan_1() {
    let range = TimeRange::parse("ytd").unwrap();
    assert_eq!(range.start.month(), 1);
    assert_eq!(range.start.day(), 1);
}

#[test]
fn test_last_days() {
    let range = TimeRange::last_days(90);
    assert_eq!(range.days(), 90);
    assert!(range.contains(Utc::now()));
}
