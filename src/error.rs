//! Error types for hutbook operations.

use crate::reservation::ReservationId;
use thiserror::Error;

/// Errors and typed rejections for reservation operations.
///
/// The validation outcomes (`PastTime`, `EndBeforeStart`, `Overlap`) are
/// expected user-facing results and are returned as values so calling code
/// can render a specific message. `InvalidTimeZone` and `InvalidInterval`
/// indicate misconfiguration and should surface at config-load time.
#[derive(Error, Debug)]
pub enum HutbookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown timezone: {0}")]
    InvalidTimeZone(String),

    #[error("Slot interval of {0} minutes does not evenly divide a day")]
    InvalidInterval(u32),

    #[error("Reservation would start in the past")]
    PastTime,

    #[error("Reservation ends before it starts")]
    EndBeforeStart,

    #[error("Range overlaps an existing reservation")]
    Overlap,

    /// Data-integrity violation: more than one confirmed reservation covers
    /// the same instant. Logged at error level, never silently resolved.
    #[error("{found} confirmed reservations cover the same instant")]
    OverlapInvariantViolated { found: usize },

    #[error("Reservation not found: {0}")]
    NotFound(ReservationId),
}

/// Result type alias for hutbook operations.
pub type HutbookResult<T> = Result<T, HutbookError>;
