//! AutoAdvanceToggled event applier

use crate::bookings::traits::EventApplier;
use shared::booking::{BookingEvent, BookingSnapshot, EventPayload};

/// AutoAdvanceToggled applier
pub struct AutoAdvanceToggledApplier;

impl EventApplier for AutoAdvanceToggledApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        if let EventPayload::AutoAdvanceToggled { enabled } = &event.payload {
            snapshot.auto_advance_enabled = *enabled;
            snapshot.updated_at = event.timestamp;
            snapshot.last_sequence = event.sequence;
        }
    }
}
