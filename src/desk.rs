//! Orchestration of the reservation flow for one resource configuration.
//!
//! Wires the pure pieces together: calendar window -> store read -> slot
//! grid / availability, and validator fast-path -> atomic store mutation ->
//! fire-and-forget notification. The desk holds no reservation state of its
//! own; every call re-reads the store.

use crate::availability::{self, Availability};
use crate::calendar;
use crate::clock::Clock;
use crate::config::ResourceConfig;
use crate::error::HutbookResult;
use crate::notify::{EventKind, NotificationDispatcher, ReservationEvent};
use crate::reservation::{OwnerRef, Reservation, ReservationId, ResourceId, TimeRange};
use crate::slots::{self, TimeSlot};
use crate::store::ReservationStore;
use crate::validator::{self, ValidationContext};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

/// How far past "now" the availability read looks for the next reservation.
const AVAILABILITY_LOOKAHEAD_DAYS: i64 = 30;

pub struct ReservationDesk<S, C> {
    store: S,
    clock: C,
    dispatcher: Box<dyn NotificationDispatcher>,
    config: ResourceConfig,
    zone: Tz,
}

impl<S: ReservationStore, C: Clock> ReservationDesk<S, C> {
    /// Fails with `InvalidTimeZone`/`InvalidInterval` at construction so
    /// misconfiguration never reaches per-request paths.
    pub fn new(
        config: ResourceConfig,
        store: S,
        clock: C,
        dispatcher: Box<dyn NotificationDispatcher>,
    ) -> HutbookResult<Self> {
        let zone = config.validate()?;
        Ok(ReservationDesk {
            store,
            clock,
            dispatcher,
            config,
            zone,
        })
    }

    /// Free/occupied right now, the occupying reservation, and the next one.
    /// Safe to poll on a timer; each call re-reads the store.
    pub fn availability(&self, resource_id: &ResourceId) -> HutbookResult<Availability> {
        let now = self.clock.now();
        let window = TimeRange::new(now - Duration::days(1), now + Duration::days(AVAILABILITY_LOOKAHEAD_DAYS));
        let reservations = self.store.list_confirmed(resource_id, &window)?;
        availability::status(now, &reservations)
    }

    /// The slot grid for the zone-local day containing `reference`.
    pub fn day_slots(
        &self,
        resource_id: &ResourceId,
        reference: DateTime<Utc>,
    ) -> HutbookResult<Vec<TimeSlot>> {
        let day = calendar::day_bounds(&self.config.timezone, reference)?;
        let reservations = self.store.list_confirmed(resource_id, &day)?;
        slots::generate(
            &day,
            self.config.slot_interval_minutes,
            &reservations,
            self.clock.now(),
        )
    }

    /// Every reservation visible in the month-view grid containing
    /// `reference`, fetched in a single window query.
    pub fn month_view(
        &self,
        resource_id: &ResourceId,
        reference: DateTime<Utc>,
    ) -> HutbookResult<Vec<Reservation>> {
        let window = calendar::visible_grid_bounds(
            &self.config.timezone,
            reference,
            self.config.week_start,
        )?;
        self.store.list_confirmed(resource_id, &window)
    }

    pub fn create(
        &self,
        resource_id: &ResourceId,
        candidate: &TimeRange,
        purpose: &str,
        owner: Option<OwnerRef>,
    ) -> HutbookResult<Reservation> {
        let effective = self.check(resource_id, candidate, None)?;

        // The store re-checks under its own commit guard; losing that race
        // surfaces the same Overlap as the fast-path above.
        let reservation = self
            .store
            .create_confirmed(resource_id, &effective, purpose, owner)?;
        self.notify(&reservation, EventKind::Created);
        Ok(reservation)
    }

    pub fn update(
        &self,
        id: &ReservationId,
        candidate: &TimeRange,
        purpose: &str,
    ) -> HutbookResult<Reservation> {
        let current = self.store.get(id)?;
        let effective = self.check(&current.resource_id, candidate, Some(*id))?;

        let updated = self.store.update_confirmed(id, &effective, purpose)?;
        self.notify(&updated, EventKind::Updated);
        Ok(updated)
    }

    pub fn delete(&self, id: &ReservationId) -> HutbookResult<()> {
        let reservation = self.store.get(id)?;
        self.store.delete(id)?;
        self.notify(&reservation, EventKind::Deleted);
        Ok(())
    }

    fn check(
        &self,
        resource_id: &ResourceId,
        candidate: &TimeRange,
        exclude: Option<ReservationId>,
    ) -> HutbookResult<TimeRange> {
        let existing = self
            .store
            .list_confirmed(resource_id, &validation_window(candidate))?;
        let ctx = ValidationContext {
            zone: self.zone,
            interval_minutes: self.config.slot_interval_minutes,
            exclude,
        };
        validator::validate(candidate, &existing, self.clock.now(), &ctx)
    }

    fn notify(&self, reservation: &Reservation, kind: EventKind) {
        let event = ReservationEvent {
            resource_id: reservation.resource_id.clone(),
            reservation: reservation.clone(),
            kind,
        };
        if let Err(err) = self.dispatcher.dispatch(&event) {
            tracing::warn!(%err, kind = ?event.kind, "notification dispatch failed");
        }
    }
}

/// Fetch window wide enough to cover the candidate even after the
/// midnight-crossing adjustment pushes its end into the next day.
fn validation_window(candidate: &TimeRange) -> TimeRange {
    TimeRange::new(
        candidate.start.min(candidate.end),
        candidate.end.max(candidate.start) + Duration::days(1),
    )
}
