//! Time helpers - business timezone windows
//!
//! All date-to-timestamp conversion happens here; storage and policy code
//! only ever see `i64` Unix millis. Every window is half-open `[start, end)`
//! in the business timezone.

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Current Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Local calendar date of a timestamp in the business timezone
fn local_date(millis: i64, tz: Tz) -> NaiveDate {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.with_timezone(&tz).date_naive(),
        None => Utc::now().with_timezone(&tz).date_naive(),
    }
}

/// Date at 00:00:00 -> Unix millis (business timezone)
///
/// DST gap fallback: if local midnight does not exist, fall back to UTC.
fn date_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = match date.and_hms_opt(0, 0, 0) {
        Some(naive) => naive,
        None => return 0,
    };
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Calendar day containing `millis` -> `[day start, next day start)`
pub fn day_bounds(millis: i64, tz: Tz) -> (i64, i64) {
    let date = local_date(millis, tz);
    let next = date.succ_opt().unwrap_or(date);
    (date_start_millis(date, tz), date_start_millis(next, tz))
}

/// Calendar month containing `millis` -> `[month start, next month start)`
pub fn month_bounds(millis: i64, tz: Tz) -> (i64, i64) {
    let date = local_date(millis, tz);
    let start = first_of_month(date);
    let next = first_of_next_month(date);
    (date_start_millis(start, tz), date_start_millis(next, tz))
}

/// The month before the one containing `millis`
pub fn prev_month_bounds(millis: i64, tz: Tz) -> (i64, i64) {
    let date = local_date(millis, tz);
    let this_start = first_of_month(date);
    let prev_start = first_of_prev_month(date);
    (
        date_start_millis(prev_start, tz),
        date_start_millis(this_start, tz),
    )
}

/// Monday-start week containing `millis` -> `[week start, next week start)`
pub fn week_bounds(millis: i64, tz: Tz) -> (i64, i64) {
    let date = local_date(millis, tz);
    let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    let next = start + Duration::days(7);
    (date_start_millis(start, tz), date_start_millis(next, tz))
}

/// The week before the one containing `millis`
pub fn prev_week_bounds(millis: i64, tz: Tz) -> (i64, i64) {
    let date = local_date(millis, tz);
    let this_start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    let prev_start = this_start - Duration::days(7);
    (
        date_start_millis(prev_start, tz),
        date_start_millis(this_start, tz),
    )
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

fn first_of_prev_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}
