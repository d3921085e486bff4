use anyhow::{anyhow, Result};
use cadence_core::models::DATE_FORMAT;
use chrono::{Local, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_english::{parse_date_string, Dialect};

/// The current local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses `yyyy-mm-dd`, falling back to natural language ("tomorrow",
/// "next friday") relative to `today`.
pub fn parse_date(date_str: &str, today: NaiveDate) -> Result<NaiveDate> {
    let trimmed = date_str.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }

    // Relative phrases are resolved from noon on `today`.
    let now = Utc.from_utc_datetime(&today.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()));
    parse_date_string(trimmed, now, Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", date_str, e))
}

/// Like [`parse_date`], with `None` meaning today.
pub fn parse_optional_date(date_str: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    date_str.map_or(Ok(today), |s| parse_date(s, today))
}

/// Parses a comma-separated weekday list such as `mon,wed,fri`.
pub fn parse_weekdays(days: &str) -> Result<Vec<Weekday>> {
    days.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| {
            d.parse::<Weekday>()
                .map_err(|_| anyhow!("Invalid day of week '{}'. Use mon, tue, wed, thu, fri, sat or sun", d))
        })
        .collect()
}
