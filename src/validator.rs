//! Accept/reject decisions for candidate reservation ranges.
//!
//! Pure and idempotent: this module never mutates state, so the accept path
//! stays testable in isolation from storage. The store re-checks overlap
//! atomically at commit time; this pass is the fast, user-facing check.

use crate::calendar;
use crate::error::{HutbookError, HutbookResult};
use crate::reservation::{Reservation, ReservationId, TimeRange};
use crate::slots;
use chrono::{DateTime, Duration, Timelike, Utc};
use chrono_tz::Tz;

/// How a candidate should be judged.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    /// Zone the resource's days are observed in.
    pub zone: Tz,
    /// Active slot interval; "now" is floored to this boundary for the
    /// past-time guard.
    pub interval_minutes: u32,
    /// Set when re-validating an update: the edited reservation is excluded
    /// from the overlap check against itself, and a start that has already
    /// passed is allowed (the reservation may already have begun).
    pub exclude: Option<ReservationId>,
}

/// Validate a candidate range against the existing reservation set.
///
/// Returns the effective range on accept: when the selection crosses
/// midnight (end wall-clock time earlier than start), the end is advanced by
/// one zone-local calendar day before the remaining checks run.
pub fn validate(
    candidate: &TimeRange,
    existing: &[Reservation],
    now: DateTime<Utc>,
    ctx: &ValidationContext,
) -> HutbookResult<TimeRange> {
    slots::check_interval(ctx.interval_minutes)?;

    let effective = adjust_midnight_crossing(candidate, ctx.zone);
    let is_update = ctx.exclude.is_some();

    if !is_update && effective.start < floor_to_interval(now, ctx.interval_minutes, ctx.zone) {
        return Err(HutbookError::PastTime);
    }

    if effective.end <= effective.start {
        return Err(HutbookError::EndBeforeStart);
    }

    let conflict = existing
        .iter()
        .filter(|r| r.is_confirmed())
        .filter(|r| Some(r.id) != ctx.exclude)
        .any(|r| r.range.overlaps(&effective));
    if conflict {
        return Err(HutbookError::Overlap);
    }

    Ok(effective)
}

/// A same-day selection like 23:00-01:00 means "into the next day": when the
/// end's zone-local wall-clock time sorts before the start's and the end
/// instant does not already lie after the start, push the end forward one
/// zone-local calendar day.
fn adjust_midnight_crossing(candidate: &TimeRange, zone: Tz) -> TimeRange {
    let start_local = candidate.start.with_timezone(&zone);
    let end_local = candidate.end.with_timezone(&zone);

    if end_local.time() < start_local.time() && candidate.end <= candidate.start {
        let wall = end_local.naive_local() + Duration::days(1);
        TimeRange::new(candidate.start, calendar::resolve_wall(zone, wall))
    } else {
        *candidate
    }
}

/// `now` floored down to the active interval boundary of its zone-local day.
/// A reservation may still be created for the slot currently in progress.
fn floor_to_interval(now: DateTime<Utc>, interval_minutes: u32, zone: Tz) -> DateTime<Utc> {
    let local = now.with_timezone(&zone);
    let minutes_into_day = local.hour() * 60 + local.minute();
    let floored = minutes_into_day - minutes_into_day % interval_minutes;

    let wall = local.date_naive().and_hms_opt(0, 0, 0).unwrap()
        + Duration::minutes(i64::from(floored));
    calendar::resolve_wall(zone, wall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::resolve_zone;
    use crate::reservation::{ReservationStatus, ResourceId};
    use chrono::TimeZone;

    fn ctx(zone: &str) -> ValidationContext {
        ValidationContext {
            zone: resolve_zone(zone).unwrap(),
            interval_minutes: 30,
            exclude: None,
        }
    }

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, minute, 0).unwrap()
    }

    fn confirmed(start: DateTime<Utc>, end: DateTime<Utc>) -> Reservation {
        Reservation {
            id: ReservationId::new(),
            resource_id: ResourceId::from("cabin-a"),
            range: TimeRange::new(start, end),
            status: ReservationStatus::Confirmed,
            purpose: "retro".to_string(),
            owner: None,
        }
    }

    #[test]
    fn test_accepts_free_future_range() {
        let candidate = TimeRange::new(at(10, 13, 0), at(10, 14, 0));
        let now = at(10, 9, 0);

        let effective = validate(&candidate, &[], now, &ctx("UTC")).unwrap();
        assert_eq!(effective, candidate);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let candidate = TimeRange::new(at(10, 13, 0), at(10, 14, 0));
        let existing = vec![confirmed(at(10, 13, 30), at(10, 14, 30))];
        let now = at(10, 9, 0);

        let first = validate(&candidate, &existing, now, &ctx("UTC"));
        let second = validate(&candidate, &existing, now, &ctx("UTC"));
        assert!(matches!(first, Err(HutbookError::Overlap)));
        assert!(matches!(second, Err(HutbookError::Overlap)));
    }

    #[test]
    fn test_midnight_crossing_advances_end_a_day() {
        // 23:00 on day 10 to "01:00" lands on day 11.
        let candidate = TimeRange::new(at(10, 23, 0), at(10, 1, 0));
        let now = at(10, 9, 0);

        let effective = validate(&candidate, &[], now, &ctx("UTC")).unwrap();
        assert_eq!(effective.start, at(10, 23, 0));
        assert_eq!(effective.end, at(11, 1, 0));
    }

    #[test]
    fn test_midnight_crossing_in_zone_local_time() {
        // 23:00-01:00 Seoul wall clock is 14:00-16:00 UTC on the same UTC
        // day; only the zone-local times reveal the crossing.
        let zone = ctx("Asia/Seoul");
        let candidate = TimeRange::new(at(10, 14, 0), at(9, 16, 0));
        let now = at(10, 1, 0);

        let effective = validate(&candidate, &[], now, &zone).unwrap();
        assert_eq!(effective.end, at(10, 16, 0));
    }

    #[test]
    fn test_midnight_crossing_rejected_on_overlap() {
        let candidate = TimeRange::new(at(10, 23, 0), at(10, 1, 0));
        let existing = vec![confirmed(at(11, 0, 0), at(11, 0, 30))];
        let now = at(10, 9, 0);

        let result = validate(&candidate, &existing, now, &ctx("UTC"));
        assert!(matches!(result, Err(HutbookError::Overlap)));
    }

    #[test]
    fn test_multi_day_range_is_not_treated_as_midnight_crossing() {
        // End wall time sorts before start wall time, but the end instant is
        // already after the start: nothing to adjust.
        let candidate = TimeRange::new(at(10, 15, 0), at(12, 9, 0));
        let now = at(10, 9, 0);

        let effective = validate(&candidate, &[], now, &ctx("UTC")).unwrap();
        assert_eq!(effective, candidate);
    }

    #[test]
    fn test_past_start_rejected_for_new_reservations() {
        let candidate = TimeRange::new(at(10, 9, 0), at(10, 10, 0));
        let now = at(10, 9, 45);

        let result = validate(&candidate, &[], now, &ctx("UTC"));
        assert!(matches!(result, Err(HutbookError::PastTime)));
    }

    #[test]
    fn test_start_within_current_interval_is_allowed() {
        // now = 9:45 floors to 9:30 with 30-minute slots, so a 9:30 start
        // (the slot in progress) is still accepted.
        let candidate = TimeRange::new(at(10, 9, 30), at(10, 10, 30));
        let now = at(10, 9, 45);

        assert!(validate(&candidate, &[], now, &ctx("UTC")).is_ok());
    }

    #[test]
    fn test_updates_may_keep_a_past_start() {
        let editing = confirmed(at(10, 9, 0), at(10, 10, 0));
        let mut context = ctx("UTC");
        context.exclude = Some(editing.id);

        // Extend a reservation that already began.
        let candidate = TimeRange::new(at(10, 9, 0), at(10, 11, 0));
        let now = at(10, 9, 45);

        let effective = validate(&candidate, &[editing], now, &context).unwrap();
        assert_eq!(effective.end, at(10, 11, 0));
    }

    #[test]
    fn test_end_before_start_rejected() {
        // Equal instants: no midnight adjustment fires, ordering fails.
        let degenerate = TimeRange::new(at(10, 13, 0), at(10, 13, 0));
        let now = at(10, 9, 0);

        let result = validate(&degenerate, &[], now, &ctx("UTC"));
        assert!(matches!(result, Err(HutbookError::EndBeforeStart)));
    }

    #[test]
    fn test_overlap_with_sibling_rejected() {
        let existing = vec![confirmed(at(10, 14, 0), at(10, 14, 30))];
        let candidate = TimeRange::new(at(10, 14, 0), at(10, 14, 30));
        let now = at(10, 9, 0);

        let result = validate(&candidate, &existing, now, &ctx("UTC"));
        assert!(matches!(result, Err(HutbookError::Overlap)));
    }

    #[test]
    fn test_touching_ranges_do_not_conflict() {
        let existing = vec![confirmed(at(10, 14, 0), at(10, 14, 30))];
        let candidate = TimeRange::new(at(10, 14, 30), at(10, 15, 0));
        let now = at(10, 9, 0);

        assert!(validate(&candidate, &existing, now, &ctx("UTC")).is_ok());
    }

    #[test]
    fn test_update_excludes_itself_from_overlap() {
        let editing = confirmed(at(10, 14, 0), at(10, 14, 30));
        let sibling = confirmed(at(10, 16, 0), at(10, 17, 0));
        let mut context = ctx("UTC");
        context.exclude = Some(editing.id);

        // Growing within its own old footprint is fine...
        let grown = TimeRange::new(at(10, 14, 0), at(10, 15, 0));
        let existing = vec![editing.clone(), sibling.clone()];
        assert!(validate(&grown, &existing, at(10, 9, 0), &context).is_ok());

        // ...but colliding with a sibling is not.
        let colliding = TimeRange::new(at(10, 14, 0), at(10, 16, 30));
        let result = validate(&colliding, &existing, at(10, 9, 0), &context);
        assert!(matches!(result, Err(HutbookError::Overlap)));
    }

    #[test]
    fn test_cancelled_siblings_do_not_conflict() {
        let mut cancelled = confirmed(at(10, 14, 0), at(10, 14, 30));
        cancelled.status = ReservationStatus::Cancelled;

        let candidate = TimeRange::new(at(10, 14, 0), at(10, 14, 30));
        assert!(validate(&candidate, &[cancelled], at(10, 9, 0), &ctx("UTC")).is_ok());
    }

    #[test]
    fn test_misconfigured_interval_fails_loudly() {
        let mut context = ctx("UTC");
        context.interval_minutes = 7;

        let candidate = TimeRange::new(at(10, 13, 0), at(10, 14, 0));
        let result = validate(&candidate, &[], at(10, 9, 0), &context);
        assert!(matches!(result, Err(HutbookError::InvalidInterval(7))));
    }
}
