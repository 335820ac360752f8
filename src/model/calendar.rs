//! Calendar boundary math in a fixed facility timezone.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// The local calendar date of an instant in `tz`.
pub fn local_date(tz: Tz, ms: i64) -> NaiveDate {
    instant(ms).with_timezone(&tz).date_naive()
}

/// The first instant of `date` in `tz`.
///
/// Ambiguous midnights resolve to the earlier instant; a midnight skipped by
/// a DST gap resolves to the first valid local time after it.
pub fn start_of_day(tz: Tz, date: NaiveDate) -> i64 {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    resolve_local(tz, midnight)
}

pub fn start_of_month(tz: Tz, date: NaiveDate) -> i64 {
    start_of_day(tz, first_of_month(date))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(chrono::Months::new(months))
        .unwrap_or(date)
}

/// The instant of `hour:00` local time on `date`, or `None` when a DST gap
/// skips that hour.
pub fn at_local_hour(tz: Tz, date: NaiveDate, hour: u32) -> Option<i64> {
    let local = date.and_hms_opt(hour, 0, 0)?;
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.timestamp_millis()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.timestamp_millis()),
        LocalResult::None => None,
    }
}

/// Most recent Monday on or before `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Local midnight `days` calendar days after the day containing `ms`.
///
/// Steps through the calendar rather than adding 24h so that DST
/// transitions keep the result on midnight.
pub fn shift_days(tz: Tz, ms: i64, days: i64) -> i64 {
    let date = local_date(tz, ms) + Duration::days(days);
    start_of_day(tz, date)
}

fn resolve_local(tz: Tz, local: NaiveDateTime) -> i64 {
    let mut probe = local;
    // DST gaps are at most a couple of hours; probe forward in 15 minute steps.
    for _ in 0..16 {
        match tz.from_local_datetime(&probe) {
            LocalResult::Single(dt) => return dt.timestamp_millis(),
            LocalResult::Ambiguous(earliest, _) => return earliest.timestamp_millis(),
            LocalResult::None => probe += Duration::minutes(15),
        }
    }
    local.and_utc().timestamp_millis()
}

pub fn instant(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default()
}
