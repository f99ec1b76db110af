//! Date/time helpers shared by the feed and filter modules.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde_json::Value;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M:%S %p",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

// epoch values above this are milliseconds
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// `DD-MM-YYYY`, the date format the `/terminal` endpoint expects.
pub fn format_query_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Today's calendar date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Parses the timestamp shapes the backend is known to emit.
///
/// Offset-carrying strings (RFC 3339 / RFC 2822) are exact; naive strings are read as wall
/// time in `tz`. Returns `None` for anything unrecognized.
pub fn parse_timestamp(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(n) = s.parse::<i64>() {
        return from_epoch(n);
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(naive, tz);
        }
    }
    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return localize(date.and_hms_opt(0, 0, 0)?, tz);
        }
    }
    None
}

/// Like [`parse_timestamp`] but also accepts JSON numbers (Unix seconds or milliseconds).
pub fn parse_timestamp_value(value: &Value, tz: Tz) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s, tz),
        Value::Number(n) => from_epoch(n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?),
        _ => None,
    }
}

fn from_epoch(n: i64) -> Option<DateTime<Utc>> {
    if n.unsigned_abs() >= MILLIS_THRESHOLD.unsigned_abs() {
        Utc.timestamp_millis_opt(n).single()
    } else {
        Utc.timestamp_opt(n, 0).single()
    }
}

fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Human display form, e.g. `10 Jan 2026, 11:06 PM`.
pub fn format_display(ts: DateTime<Utc>, tz: Tz) -> String {
    ts.with_timezone(&tz).format("%d %b %Y, %I:%M %p").to_string()
}

/// Hour of day (0-23) of `ts` on the wall clock of `tz`.
pub fn local_hour(ts: DateTime<Utc>, tz: Tz) -> u32 {
    ts.with_timezone(&tz).hour()
}
