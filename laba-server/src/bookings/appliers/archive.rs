//! Archive appliers - soft delete and restore

use crate::bookings::traits::EventApplier;
use shared::booking::{BookingEvent, BookingSnapshot, BookingStatus};

/// BookingDeleted applier - flags only, the record itself survives
pub struct BookingDeletedApplier;

impl EventApplier for BookingDeletedApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        snapshot.is_deleted = true;
        snapshot.deleted_at = Some(event.timestamp);
        snapshot.updated_at = event.timestamp;
        snapshot.last_sequence = event.sequence;
    }
}

/// BookingRestored applier
///
/// A deleted record comes back to its prior status with the deletion
/// flags cleared; a rejected record returns to PendingBooking for
/// re-review with the reason cleared.
pub struct BookingRestoredApplier;

impl EventApplier for BookingRestoredApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        if snapshot.is_deleted {
            snapshot.is_deleted = false;
            snapshot.deleted_at = None;
            snapshot.moved_to_history_at = None;
        } else if snapshot.status == BookingStatus::Rejected {
            snapshot.status = BookingStatus::PendingBooking;
            snapshot.rejection_reason = None;
        }
        snapshot.updated_at = event.timestamp;
        snapshot.last_sequence = event.sequence;
    }
}
