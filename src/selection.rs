//! Click-driven range selection over a slot grid.
//!
//! Lets a user build an arbitrary-length `[start, end)` range with single
//! clicks instead of a drag gesture, while guaranteeing the live selection
//! never silently includes a reserved slot. Modeled as a three-state machine
//! with a pure transition function: callers hold a `Selection` value and
//! replace it on every click.

use crate::reservation::{any_confirmed_overlap, Reservation, TimeRange};
use crate::slots::TimeSlot;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Nothing selected.
    #[default]
    Empty,
    /// A single-slot selection; the provisional end is one interval after.
    Anchored { start: DateTime<Utc> },
    /// A contiguous multi-slot candidate range.
    Ranged(TimeRange),
}

impl Selection {
    /// The candidate range this selection currently denotes, if any.
    pub fn range(&self, interval: Duration) -> Option<TimeRange> {
        match self {
            Selection::Empty => None,
            Selection::Anchored { start } => Some(TimeRange::new(*start, *start + interval)),
            Selection::Ranged(range) => Some(*range),
        }
    }

    /// Clear the selection. Called on date/zone change and after a
    /// successful submission.
    pub fn reset(self) -> Selection {
        Selection::Empty
    }

    /// Apply one slot click and return the next selection state.
    pub fn click(
        self,
        slot: &TimeSlot,
        interval: Duration,
        reservations: &[Reservation],
    ) -> Selection {
        match self {
            Selection::Empty => {
                if slot.is_reserved || slot.is_past {
                    Selection::Empty
                } else {
                    Selection::Anchored {
                        start: slot.range.start,
                    }
                }
            }
            Selection::Anchored { start } => {
                // Clicking the anchor again clears the selection entirely.
                if slot.range.start == start {
                    Selection::Empty
                } else {
                    extend(TimeRange::new(start, start + interval), slot, reservations)
                }
            }
            Selection::Ranged(range) => {
                if range.contains_instant(slot.range.start) {
                    shrink(range, slot, interval)
                } else {
                    extend(range, slot, reservations)
                }
            }
        }
    }

    /// Provisional span to show while hovering slot `hovered`. Display-only,
    /// never authoritative. `None` when nothing is anchored or when the span
    /// would cross a reserved slot.
    pub fn hover_preview(
        &self,
        hovered: &TimeSlot,
        interval: Duration,
        reservations: &[Reservation],
    ) -> Option<TimeRange> {
        let Selection::Anchored { start } = self else {
            return None;
        };
        let span = TimeRange::new(
            (*start).min(hovered.range.start),
            (*start + interval).max(hovered.range.end),
        );
        if any_confirmed_overlap(&span, reservations) {
            None
        } else {
            Some(span)
        }
    }
}

/// Clicking inside the current range shrinks it from whichever edge was hit.
/// An interior hit is ambiguous intent: reset rather than split.
fn shrink(range: TimeRange, slot: &TimeSlot, interval: Duration) -> Selection {
    let single = range.end - range.start == interval;
    if slot.range.start == range.start {
        if single {
            Selection::Empty
        } else {
            Selection::Ranged(TimeRange::new(range.start + interval, range.end))
        }
    } else if slot.range.end == range.end {
        Selection::Ranged(TimeRange::new(range.start, range.end - interval))
    } else {
        Selection::Empty
    }
}

/// Extend the current range toward a slot outside it. If the extended span
/// would cross a reserved slot, the old anchor is discarded and a fresh
/// single-slot selection starts at the clicked slot instead; the validator
/// then has the final say on that slot.
fn extend(current: TimeRange, slot: &TimeSlot, reservations: &[Reservation]) -> Selection {
    let span = TimeRange::new(
        current.start.min(slot.range.start),
        current.end.max(slot.range.end),
    );
    if any_confirmed_overlap(&span, reservations) {
        Selection::Anchored {
            start: slot.range.start,
        }
    } else {
        Selection::Ranged(span)
    }
}
