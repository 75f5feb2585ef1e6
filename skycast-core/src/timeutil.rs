//! Timestamp-to-calendar helpers.
//!
//! All predicates and formatters operate on the observer's local calendar.
//! Each function has a `*_in` variant generic over [`chrono::TimeZone`] so
//! callers (and tests) can pin a fixed offset; the plain variants use
//! [`Local`].

use chrono::{DateTime, Local, NaiveDate, TimeZone, Timelike, Utc};
use std::fmt::Display;

/// Unix seconds to a datetime in `tz`. Conversion goes through UTC, so a
/// local-timezone DST fold can never make the instant ambiguous.
fn datetime_in<Tz: TimeZone>(ts: i64, tz: &Tz) -> DateTime<Tz> {
    DateTime::from_timestamp(ts, 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(tz)
}

/// Calendar date of `ts` in `tz`. This is the grouping key for day buckets.
pub fn local_date_in<Tz: TimeZone>(ts: i64, tz: &Tz) -> NaiveDate {
    datetime_in(ts, tz).date_naive()
}

/// Full weekday name, e.g. "Monday".
pub fn day_name(ts: i64) -> String {
    day_name_in(ts, &Local)
}

pub fn day_name_in<Tz: TimeZone>(ts: i64, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    datetime_in(ts, tz).format("%A").to_string()
}

/// Abbreviated month plus day, e.g. "Jan 5".
pub fn short_date(ts: i64) -> String {
    short_date_in(ts, &Local)
}

pub fn short_date_in<Tz: TimeZone>(ts: i64, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    datetime_in(ts, tz).format("%b %-d").to_string()
}

/// Weekday, full month, day and year, e.g. "Saturday, January 1, 2022".
pub fn long_date(ts: i64) -> String {
    long_date_in(ts, &Local)
}

pub fn long_date_in<Tz: TimeZone>(ts: i64, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    datetime_in(ts, tz).format("%A, %B %-d, %Y").to_string()
}

/// Clock time as `HH:MM`.
pub fn time_of_day(ts: i64) -> String {
    time_of_day_in(ts, &Local)
}

pub fn time_of_day_in<Tz: TimeZone>(ts: i64, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    datetime_in(ts, tz).format("%H:%M").to_string()
}

/// Hour of day, 0–23.
pub fn hour_of_day(ts: i64) -> u32 {
    hour_of_day_in(ts, &Local)
}

pub fn hour_of_day_in<Tz: TimeZone>(ts: i64, tz: &Tz) -> u32 {
    datetime_in(ts, tz).hour()
}

/// True iff `ts` falls on the current local calendar date.
pub fn is_today(ts: i64) -> bool {
    is_same_day(ts, Utc::now().timestamp())
}

/// True iff both timestamps fall on the same local calendar date.
pub fn is_same_day(ts1: i64, ts2: i64) -> bool {
    is_same_day_in(ts1, ts2, &Local)
}

pub fn is_same_day_in<Tz: TimeZone>(ts1: i64, ts2: i64, tz: &Tz) -> bool {
    local_date_in(ts1, tz) == local_date_in(ts2, tz)
}
