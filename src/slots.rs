//! Fixed-interval partition of a zone-local day.

use crate::error::{HutbookError, HutbookResult};
use crate::reservation::{any_confirmed_overlap, Reservation, TimeRange};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// One selectable cell of a day grid. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub range: TimeRange,
    /// The slot intersects a confirmed reservation.
    pub is_reserved: bool,
    /// The slot has fully elapsed. Only meaningful when the grid shows today.
    pub is_past: bool,
    /// `now` falls within the slot.
    pub is_current: bool,
}

/// Check that an interval is usable for a day grid.
pub fn check_interval(interval_minutes: u32) -> HutbookResult<()> {
    if interval_minutes == 0 || MINUTES_PER_DAY % interval_minutes != 0 {
        return Err(HutbookError::InvalidInterval(interval_minutes));
    }
    Ok(())
}

/// Partition `day` into slots of `interval_minutes`, tagging each against the
/// reservation set and `now`.
///
/// The interval must evenly divide 1440 minutes. On DST-shortened or
/// -lengthened days the walk covers the day's real span; the final slot is
/// clamped to the day's end.
pub fn generate(
    day: &TimeRange,
    interval_minutes: u32,
    reservations: &[Reservation],
    now: DateTime<Utc>,
) -> HutbookResult<Vec<TimeSlot>> {
    check_interval(interval_minutes)?;

    let step = Duration::minutes(i64::from(interval_minutes));
    let mut slots = Vec::with_capacity((MINUTES_PER_DAY / interval_minutes) as usize);

    let mut start = day.start;
    while start < day.end {
        let end = (start + step).min(day.end);
        let range = TimeRange::new(start, end);
        slots.push(TimeSlot {
            range,
            is_reserved: any_confirmed_overlap(&range, reservations),
            is_past: end <= now,
            is_current: range.contains_instant(now),
        });
        start = end;
    }

    Ok(slots)
}
