//! Free/occupied status derived from a reservation set.

use crate::error::{HutbookError, HutbookResult};
use crate::reservation::Reservation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityState {
    Free,
    Occupied,
}

/// What a resource looks like at one instant: whether it is occupied, by
/// which reservation, and which confirmed reservation comes next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub state: AvailabilityState,
    pub current: Option<Reservation>,
    pub next: Option<Reservation>,
}

/// Derive a resource's status at `now` from its reservations.
///
/// Stateless: callers polling on a refresh timer re-invoke this with a fresh
/// reservation list; each caller owns its own cadence.
///
/// At most one confirmed reservation may cover `now` under the no-overlap
/// invariant. Finding more than one is a data-integrity violation and fails
/// with `OverlapInvariantViolated` rather than silently picking one.
pub fn status(now: DateTime<Utc>, reservations: &[Reservation]) -> HutbookResult<Availability> {
    let covering: Vec<&Reservation> = reservations
        .iter()
        .filter(|r| r.is_confirmed() && r.range.contains_instant(now))
        .collect();

    if covering.len() > 1 {
        tracing::error!(
            found = covering.len(),
            at = %now,
            "overlap invariant violated: multiple confirmed reservations cover the same instant"
        );
        return Err(HutbookError::OverlapInvariantViolated {
            found: covering.len(),
        });
    }

    let current = covering.first().map(|r| (*r).clone());

    let next = reservations
        .iter()
        .filter(|r| r.is_confirmed() && r.range.start > now)
        .min_by_key(|r| r.range.start)
        .cloned();

    let state = if current.is_some() {
        AvailabilityState::Occupied
    } else {
        AvailabilityState::Free
    };

    Ok(Availability {
        state,
        current,
        next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::{OwnerRef, ReservationId, ReservationStatus, ResourceId, TimeRange};
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, hour, minute, 0).unwrap()
    }

    fn confirmed(start: DateTime<Utc>, end: DateTime<Utc>) -> Reservation {
        Reservation {
            id: ReservationId::new(),
            resource_id: ResourceId::from("cabin-a"),
            range: TimeRange::new(start, end),
            status: ReservationStatus::Confirmed,
            purpose: "standup".to_string(),
            owner: Some(OwnerRef::Member("m-1".to_string())),
        }
    }

    #[test]
    fn test_occupied_with_current_and_next() {
        let reservations = vec![
            confirmed(at(14, 0), at(14, 30)),
            confirmed(at(15, 0), at(15, 30)),
        ];

        let availability = status(at(14, 15), &reservations).unwrap();

        assert_eq!(availability.state, AvailabilityState::Occupied);
        assert_eq!(availability.current.unwrap().range.start, at(14, 0));
        assert_eq!(availability.next.unwrap().range.start, at(15, 0));
    }

    #[test]
    fn test_free_between_reservations() {
        let reservations = vec![
            confirmed(at(10, 0), at(11, 0)),
            confirmed(at(15, 0), at(15, 30)),
        ];

        let availability = status(at(12, 0), &reservations).unwrap();

        assert_eq!(availability.state, AvailabilityState::Free);
        assert!(availability.current.is_none());
        assert_eq!(availability.next.unwrap().range.start, at(15, 0));
    }

    #[test]
    fn test_free_with_nothing_upcoming() {
        let reservations = vec![confirmed(at(10, 0), at(11, 0))];
        let availability = status(at(18, 0), &reservations).unwrap();

        assert_eq!(availability.state, AvailabilityState::Free);
        assert!(availability.current.is_none());
        assert!(availability.next.is_none());
    }

    #[test]
    fn test_reservation_starting_exactly_now_is_current() {
        let reservations = vec![confirmed(at(14, 0), at(14, 30))];
        let availability = status(at(14, 0), &reservations).unwrap();

        assert_eq!(availability.state, AvailabilityState::Occupied);
    }

    #[test]
    fn test_cancelled_reservations_never_count() {
        let mut cancelled = confirmed(at(14, 0), at(14, 30));
        cancelled.status = ReservationStatus::Cancelled;

        let availability = status(at(14, 15), &[cancelled]).unwrap();
        assert_eq!(availability.state, AvailabilityState::Free);
        assert!(availability.next.is_none());
    }

    #[test]
    fn test_two_reservations_covering_now_is_an_integrity_violation() {
        let reservations = vec![
            confirmed(at(14, 0), at(15, 0)),
            confirmed(at(14, 30), at(15, 30)),
        ];

        let err = status(at(14, 45), &reservations).unwrap_err();
        assert!(matches!(
            err,
            HutbookError::OverlapInvariantViolated { found: 2 }
        ));
    }

    #[test]
    fn test_status_is_idempotent() {
        let reservations = vec![confirmed(at(14, 0), at(14, 30))];

        let first = status(at(14, 15), &reservations).unwrap();
        let second = status(at(14, 15), &reservations).unwrap();

        assert_eq!(first.state, second.state);
        assert_eq!(
            first.current.map(|r| r.id),
            second.current.map(|r| r.id)
        );
    }
}
