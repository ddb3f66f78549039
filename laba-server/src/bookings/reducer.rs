//! Snapshot reducer
//!
//! Rebuilds a booking snapshot by replaying its event stream through
//! the appliers, in sequence order. Used for verification and recovery;
//! the result must equal the incrementally maintained snapshot.

use shared::booking::{BookingEvent, BookingSnapshot};

use super::appliers::EventAction;
use super::traits::EventApplier;

/// Fold an event stream into a snapshot
///
/// Events must belong to the same booking and be sorted by sequence;
/// storage returns them that way.
pub fn reduce(booking_id: &str, events: &[BookingEvent]) -> BookingSnapshot {
    let mut snapshot = BookingSnapshot::new(booking_id.to_string());
    for event in events {
        let applier: EventAction = event.into();
        applier.apply(&mut snapshot, event);
    }
    snapshot
}
