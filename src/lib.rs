//! Availability and reservation-conflict core for shared cabin/room booking.
//!
//! This crate answers, for any bookable resource: is it free right now, what
//! range is occupied, what comes next, and can a proposed new range be
//! accepted without overlapping an existing confirmed reservation.
//!
//! - `calendar` — zone-aware day/month/grid boundaries as UTC instants
//! - `availability` — free/occupied status derived from a reservation set
//! - `slots` + `selection` — a discrete day grid and the click-driven
//!   range-selection state machine over it
//! - `validator` — the accept/reject rules governing create and update
//! - `store` — the storage boundary, with an in-memory reference store
//! - `desk` — orchestration of the whole flow for one resource config
//!
//! Everything is a pure computation over values passed in; the only shared
//! state lives behind the `ReservationStore` boundary, which enforces the
//! no-overlap invariant atomically at commit time.

pub mod availability;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod desk;
pub mod error;
pub mod notify;
pub mod reservation;
pub mod selection;
pub mod slots;
pub mod store;
pub mod validator;

pub use availability::{Availability, AvailabilityState};
pub use calendar::WeekStart;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ResourceConfig;
pub use desk::ReservationDesk;
pub use error::{HutbookError, HutbookResult};
pub use notify::{EventKind, LogDispatcher, NotificationDispatcher, ReservationEvent};
pub use reservation::{
    OwnerRef, Reservation, ReservationId, ReservationStatus, ResourceId, TimeRange,
};
pub use selection::Selection;
pub use slots::TimeSlot;
pub use store::{MemoryStore, ReservationStore};
pub use validator::{validate, ValidationContext};
