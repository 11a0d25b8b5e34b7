//! Time range parsing and calculations
//!
//! Supports relative ranges (7d, 30d), predefined ranges (today, mtd,
//! ytd), and custom date ranges. Calculates the previous period of equal
//! length for trend comparisons.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::error::{AnalyticsError, Result};

/// A time range for KPI queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    /// Start of the range (inclusive)
    pub start: DateTime<Utc>,
    /// End of the range (inclusive)
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Create a new time range
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(AnalyticsError::InvalidTimeRange(
                "end must be after start".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Parse a time range string
    ///
    /// Supported formats:
    /// - Relative: `1h`, `24h`, `7d`, `30d`, `90d`, `1y`
    /// - Predefined: `today`, `yesterday`, `mtd`, `ytd`
    /// - Custom: `2024-01-01,2024-01-31`
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        let now = Utc::now();

        if let Some(range) = Self::parse_predefined(&s, now) {
            return Ok(range);
        }

        if let Some(range) = Self::parse_relative(&s, now) {
            return Ok(range);
        }

        if let Some(range) = Self::parse_custom(&s)? {
            return Ok(range);
        }

        Err(AnalyticsError::InvalidTimeRange(format!(
            "unknown time range format: {}",
            s
        )))
    }

    /// The last `days` calendar days, ending today
    pub fn last_days(days: i64) -> Self {
        let now = Utc::now();
        Self {
            start: start_of_day(now - Duration::days(days - 1)),
            end: end_of_day(now),
        }
    }

    /// Get the previous period of the same duration
    pub fn previous_period(&self) -> Self {
        let duration = self.end - self.start;
        Self {
            start: self.start - duration - Duration::seconds(1),
            end: self.start - Duration::seconds(1),
        }
    }

    /// Get the number of calendar days in this range (inclusive)
    pub fn days(&self) -> i64 {
        // Both endpoints are inclusive
        (self.end - self.start).num_days() + 1
    }

    /// Whether a timestamp falls inside this range
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    fn parse_predefined(s: &str, now: DateTime<Utc>) -> Option<Self> {
        let today_start = start_of_day(now);
        let today_end = end_of_day(now);

        match s {
            "today" => Some(Self {
                start: today_start,
                end: today_end,
            }),
            "yesterday" => Some(Self {
                start: today_start - Duration::days(1),
                end: today_end - Duration::days(1),
            }),
            "mtd" => now
                .date_naive()
                .with_day(1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|t| Self {
                    start: t.and_utc(),
                    end: today_end,
                }),
            "ytd" => NaiveDate::from_ymd_opt(now.year(), 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|t| Self {
                    start: t.and_utc(),
                    end: today_end,
                }),
            _ => None,
        }
    }

    fn parse_relative(s: &str, now: DateTime<Utc>) -> Option<Self> {
        let unit = s.chars().last()?;
        if !unit.is_ascii_alphabetic() {
            return None;
        }
        let num: i64 = s[..s.len() - 1].parse().ok()?;
        if num <= 0 {
            return None;
        }

        match unit {
            'h' => Some(Self {
                start: now - Duration::hours(num),
                end: now,
            }),
            // 7d means today plus the 6 previous days
            'd' => Some(Self {
                start: start_of_day(now - Duration::days(num - 1)),
                end: end_of_day(now),
            }),
            'y' => Some(Self {
                start: start_of_day(now - Duration::days(num * 365 - 1)),
                end: end_of_day(now),
            }),
            _ => None,
        }
    }

    fn parse_custom(s: &str) -> Result<Option<Self>> {
        // Format: 2024-01-01,2024-01-31
        let Some((first, second)) = s.split_once(',') else {
            return Ok(None);
        };

        let start_date = parse_date(first.trim())?;
        let end_date = parse_date(second.trim())?;

        let start = start_date
            .and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc())
            .unwrap_or_else(Utc::now);
        let end = end_date
            .and_hms_opt(23, 59, 59)
            .map(|t| t.and_utc())
            .unwrap_or_else(Utc::now);

        Self::new(start, end).map(Some)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        AnalyticsError::InvalidTimeRange(format!("invalid date format: {} (use YYYY-MM-DD)", s))
    })
}

fn start_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc())
        .unwrap_or(dt)
}

fn end_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive()
        .and_hms_opt(23, 59, 59)
        .map(|t| t.and_utc())
        .unwrap_or(dt)
}
