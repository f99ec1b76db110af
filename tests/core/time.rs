use chrono::NaiveDate;
use chrono_tz::Asia::Kolkata;
use serde_json::json;
use sm_terminal::core::time::{
    format_display, format_query_date, local_hour, parse_timestamp, parse_timestamp_value,
};

use crate::common::ts;

#[test]
fn query_dates_are_day_month_year() {
    let d = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
    assert_eq!(format_query_date(d), "09-01-2026");
}

#[test]
fn known_timestamp_shapes_parse() {
    let want = ts("2026-01-10T17:36:00Z");
    for raw in [
        "2026-01-10T17:36:00Z",
        "2026-01-10T23:06:00+05:30",
        "Sat, 10 Jan 2026 17:36:00 +0000",
        "1768066560",
        "1768066560000",
        "2026-01-10 23:06:00",
        "2026-01-10T23:06:00.000",
        "10-01-2026 23:06",
        "10/01/2026 11:06:00 PM",
    ] {
        assert_eq!(parse_timestamp(raw, Kolkata), Some(want), "{raw}");
    }
    assert_eq!(parse_timestamp("", Kolkata), None);
    assert_eq!(parse_timestamp("yesterday", Kolkata), None);
}

#[test]
fn json_numbers_are_epoch_seconds_or_millis() {
    let want = ts("2026-01-10T17:36:00Z");
    assert_eq!(parse_timestamp_value(&json!(1_768_066_560), Kolkata), Some(want));
    assert_eq!(parse_timestamp_value(&json!(1_768_066_560_000_i64), Kolkata), Some(want));
    assert_eq!(parse_timestamp_value(&json!(true), Kolkata), None);
}

#[test]
fn display_and_hour_use_the_given_zone() {
    let t = ts("2026-01-10T17:36:00Z");
    assert_eq!(format_display(t, Kolkata), "10 Jan 2026, 11:06 PM");
    assert_eq!(local_hour(t, Kolkata), 23);
    assert_eq!(local_hour(t, chrono_tz::UTC), 17);
}
