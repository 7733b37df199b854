//! Storage boundary for reservations.
//!
//! The core never assumes which technology backs the store; it only needs
//! windowed reads of confirmed rows and atomic writes. Two concurrent
//! creates for overlapping ranges must not both succeed: mutations enforce
//! the no-overlap invariant at commit time (a conditional insert, an
//! exclusion constraint, or a re-check inside a transaction). The in-process
//! validator pass is a fast-path UX check, not the correctness guarantee.

mod memory;

pub use memory::MemoryStore;

use crate::error::HutbookResult;
use crate::reservation::{OwnerRef, Reservation, ReservationId, ResourceId, TimeRange};

pub trait ReservationStore: Send + Sync {
    /// Confirmed reservations of `resource_id` intersecting `window`.
    fn list_confirmed(
        &self,
        resource_id: &ResourceId,
        window: &TimeRange,
    ) -> HutbookResult<Vec<Reservation>>;

    /// Fetch one reservation regardless of status.
    fn get(&self, id: &ReservationId) -> HutbookResult<Reservation>;

    /// Insert a confirmed reservation, failing with `Overlap` if the range
    /// collides with an existing confirmed row at commit time. A caller that
    /// loses this race may safely retry with a re-fetched reservation set.
    fn create_confirmed(
        &self,
        resource_id: &ResourceId,
        range: &TimeRange,
        purpose: &str,
        owner: Option<OwnerRef>,
    ) -> HutbookResult<Reservation>;

    /// Replace a confirmed reservation's range and purpose, re-checking
    /// overlap against its siblings (the row itself is excluded).
    fn update_confirmed(
        &self,
        id: &ReservationId,
        range: &TimeRange,
        purpose: &str,
    ) -> HutbookResult<Reservation>;

    /// Soft-delete: flip status to cancelled so the row stops counting
    /// toward overlap.
    fn delete(&self, id: &ReservationId) -> HutbookResult<()>;
}
