//! Post-mutation notification seam.
//!
//! After a successful create, update, or delete, the core emits a
//! `ReservationEvent` that a collaborator may forward to chat or webhook
//! channels. Dispatch is fire-and-forget: a failure is logged locally and
//! never rolls back or blocks the reservation mutation.

use crate::error::HutbookResult;
use crate::reservation::{Reservation, ResourceId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationEvent {
    pub resource_id: ResourceId,
    pub reservation: Reservation,
    pub kind: EventKind,
}

pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, event: &ReservationEvent) -> HutbookResult<()>;
}

/// Dispatcher that only logs the event locally.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDispatcher;

impl NotificationDispatcher for LogDispatcher {
    fn dispatch(&self, event: &ReservationEvent) -> HutbookResult<()> {
        tracing::info!(
            resource = %event.resource_id,
            reservation = %event.reservation.id,
            kind = ?event.kind,
            "reservation event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::{ReservationId, ReservationStatus, TimeRange};
    use chrono::{TimeZone, Utc};

    fn make_event(kind: EventKind) -> ReservationEvent {
        let resource_id = ResourceId::from("cabin-a");
        ReservationEvent {
            resource_id: resource_id.clone(),
            reservation: Reservation {
                id: ReservationId::new(),
                resource_id,
                range: TimeRange::new(
                    Utc.with_ymd_and_hms(2025, 6, 10, 14, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2025, 6, 10, 14, 30, 0).unwrap(),
                ),
                status: ReservationStatus::Confirmed,
                purpose: "sauna".to_string(),
                owner: None,
            },
            kind,
        }
    }

    #[test]
    fn test_log_dispatcher_never_fails() {
        assert!(LogDispatcher.dispatch(&make_event(EventKind::Created)).is_ok());
    }

    #[test]
    fn test_event_serializes_for_webhook_payloads() {
        let payload = serde_json::to_value(make_event(EventKind::Deleted)).unwrap();

        assert_eq!(payload["kind"], "deleted");
        assert_eq!(payload["resource_id"], "cabin-a");
        assert_eq!(payload["reservation"]["status"], "confirmed");
    }
}
