//! Zone-aware calendar boundaries.
//!
//! Converts a reference instant plus an IANA zone into day, month, and
//! month-view-grid boundaries expressed as UTC instants. The zone's UTC
//! offset is computed at each target boundary, not at the reference instant,
//! so boundaries stay correct across DST transitions where the offset at
//! day-start differs from day-end.

use crate::error::{HutbookError, HutbookResult};
use crate::reservation::TimeRange;
use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// First day of the week for month-view grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Sunday,
    Monday,
}

/// Resolve an IANA zone identifier.
///
/// Intended for config-load time so a bad identifier fails loudly at startup
/// rather than per request.
pub fn resolve_zone(zone: &str) -> HutbookResult<Tz> {
    Tz::from_str(zone).map_err(|_| HutbookError::InvalidTimeZone(zone.to_string()))
}

/// Midnight-to-midnight of `reference`'s calendar date as observed in `zone`,
/// returned as UTC instants.
///
/// On a spring-forward date the returned pair spans 23 real hours; on a
/// fall-back date, 25.
pub fn day_bounds(zone: &str, reference: DateTime<Utc>) -> HutbookResult<TimeRange> {
    let tz = resolve_zone(zone)?;
    let date = reference.with_timezone(&tz).date_naive();
    Ok(TimeRange::new(
        local_midnight(tz, date),
        local_midnight(tz, date + Duration::days(1)),
    ))
}

/// First-of-month 00:00 to first-of-next-month 00:00 in `zone`.
pub fn month_bounds(zone: &str, reference: DateTime<Utc>) -> HutbookResult<TimeRange> {
    let tz = resolve_zone(zone)?;
    let date = reference.with_timezone(&tz).date_naive();
    Ok(TimeRange::new(
        local_midnight(tz, first_of_month(date)),
        local_midnight(tz, first_of_next_month(date)),
    ))
}

/// The full window a month view displays: the month padded outward to the
/// containing weeks before and after it.
///
/// Lets a month view batch-fetch reservations in a single window query.
pub fn visible_grid_bounds(
    zone: &str,
    reference: DateTime<Utc>,
    week_start: WeekStart,
) -> HutbookResult<TimeRange> {
    let tz = resolve_zone(zone)?;
    let date = reference.with_timezone(&tz).date_naive();

    let first = first_of_month(date);
    let next_first = first_of_next_month(date);
    let last = next_first - Duration::days(1);

    let lead = days_into_week(first.weekday(), week_start);
    let trail = 6 - days_into_week(last.weekday(), week_start);

    Ok(TimeRange::new(
        local_midnight(tz, first - Duration::days(i64::from(lead))),
        local_midnight(tz, next_first + Duration::days(i64::from(trail))),
    ))
}

/// Resolve a zone-local wall-clock time to a UTC instant.
///
/// A wall time erased by a DST gap resolves to the first valid wall time
/// after it; an ambiguous wall time (fold) resolves to the earlier instant.
pub(crate) fn resolve_wall(tz: Tz, wall: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&wall) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
        LocalResult::None => {
            // Inside a DST gap. Gaps are at most a few hours; probe forward
            // in 15-minute steps until the wall clock exists again.
            let mut probe = wall;
            loop {
                probe += Duration::minutes(15);
                match tz.from_local_datetime(&probe) {
                    LocalResult::Single(dt) => return dt.with_timezone(&Utc),
                    LocalResult::Ambiguous(earlier, _) => return earlier.with_timezone(&Utc),
                    LocalResult::None => continue,
                }
            }
        }
    }
}

fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    resolve_wall(tz, date.and_hms_opt(0, 0, 0).unwrap())
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1).unwrap()
    }
}

fn days_into_week(weekday: Weekday, week_start: WeekStart) -> u32 {
    match week_start {
        WeekStart::Sunday => weekday.num_days_from_sunday(),
        WeekStart::Monday => weekday.num_days_from_monday(),
    }
}
