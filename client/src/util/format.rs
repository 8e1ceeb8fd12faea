//! Display formatting and calendar-date helpers.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Calendar date as exchanged with the backend and date inputs.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Probability in `[0, 1]` as a percentage bounded to `[0, 100]`.
///
/// NaN maps to 0 so a malformed value never renders as `NaN%`.
#[must_use]
pub fn percent(probability: f64) -> f64 {
    if probability.is_nan() {
        return 0.0;
    }
    (probability * 100.0).clamp(0.0, 100.0)
}

/// `0.87` -> `"87.00%"`.
#[must_use]
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}%", percent(probability))
}

/// Today's date in UTC.
#[must_use]
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// Parse the leading `YYYY-MM-DD` of a date or datetime string. Every part
/// must be plain digits; signs are rejected.
#[must_use]
pub fn parse_leading_date(raw: &str) -> Option<Date> {
    let head = raw.trim().get(..10)?;
    if !head.bytes().next().is_some_and(|b| b.is_ascii_digit()) {
        return None;
    }
    Date::parse(head, DATE_FORMAT).ok()
}

/// Milliseconds since the Unix epoch; the clock fed to `tick`.
#[must_use]
pub fn now_ms() -> u64 {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    u64::try_from(millis).unwrap_or(0)
}
