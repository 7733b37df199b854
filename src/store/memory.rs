//! In-memory reference store.

use super::ReservationStore;
use crate::error::{HutbookError, HutbookResult};
use crate::reservation::{
    OwnerRef, Reservation, ReservationId, ReservationStatus, ResourceId, TimeRange,
};
use std::sync::Mutex;

/// Mutex-guarded reservation store.
///
/// Every mutation re-checks the no-overlap invariant under the lock, so of
/// two racing creates for overlapping ranges exactly one commits; the loser
/// gets the same `Overlap` a validator fast-path would have produced.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Reservation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn conflicts(
        rows: &[Reservation],
        resource_id: &ResourceId,
        range: &TimeRange,
        exclude: Option<&ReservationId>,
    ) -> bool {
        rows.iter()
            .filter(|r| r.is_confirmed() && &r.resource_id == resource_id)
            .filter(|r| Some(&r.id) != exclude)
            .any(|r| r.range.overlaps(range))
    }
}

impl ReservationStore for MemoryStore {
    fn list_confirmed(
        &self,
        resource_id: &ResourceId,
        window: &TimeRange,
    ) -> HutbookResult<Vec<Reservation>> {
        let rows = self.rows.lock().expect("reservation store lock poisoned");
        Ok(rows
            .iter()
            .filter(|r| {
                r.is_confirmed() && &r.resource_id == resource_id && r.range.overlaps(window)
            })
            .cloned()
            .collect())
    }

    fn get(&self, id: &ReservationId) -> HutbookResult<Reservation> {
        let rows = self.rows.lock().expect("reservation store lock poisoned");
        rows.iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or(HutbookError::NotFound(*id))
    }

    fn create_confirmed(
        &self,
        resource_id: &ResourceId,
        range: &TimeRange,
        purpose: &str,
        owner: Option<OwnerRef>,
    ) -> HutbookResult<Reservation> {
        let mut rows = self.rows.lock().expect("reservation store lock poisoned");
        if Self::conflicts(&rows, resource_id, range, None) {
            return Err(HutbookError::Overlap);
        }

        let reservation = Reservation {
            id: ReservationId::new(),
            resource_id: resource_id.clone(),
            range: *range,
            status: ReservationStatus::Confirmed,
            purpose: purpose.to_string(),
            owner,
        };
        rows.push(reservation.clone());
        Ok(reservation)
    }

    fn update_confirmed(
        &self,
        id: &ReservationId,
        range: &TimeRange,
        purpose: &str,
    ) -> HutbookResult<Reservation> {
        let mut rows = self.rows.lock().expect("reservation store lock poisoned");

        let index = rows
            .iter()
            .position(|r| &r.id == id && r.is_confirmed())
            .ok_or(HutbookError::NotFound(*id))?;

        let resource_id = rows[index].resource_id.clone();
        if Self::conflicts(&rows, &resource_id, range, Some(id)) {
            return Err(HutbookError::Overlap);
        }

        let row = &mut rows[index];
        row.range = *range;
        row.purpose = purpose.to_string();
        Ok(row.clone())
    }

    fn delete(&self, id: &ReservationId) -> HutbookResult<()> {
        let mut rows = self.rows.lock().expect("reservation store lock poisoned");
        let row = rows
            .iter_mut()
            .find(|r| &r.id == id && r.is_confirmed())
            .ok_or(HutbookError::NotFound(*id))?;
        row.status = ReservationStatus::Cancelled;
        Ok(())
    }
}
