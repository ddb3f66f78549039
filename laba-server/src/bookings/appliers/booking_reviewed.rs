//! Review event appliers - approved, rejected, cancelled

use crate::bookings::traits::EventApplier;
use shared::booking::{BookingEvent, BookingSnapshot, BookingStatus, EventPayload};

/// BookingApproved applier
pub struct BookingApprovedApplier;

impl EventApplier for BookingApprovedApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        snapshot.status = BookingStatus::Approved;
        snapshot.updated_at = event.timestamp;
        snapshot.last_sequence = event.sequence;
    }
}

/// BookingRejected applier
pub struct BookingRejectedApplier;

impl EventApplier for BookingRejectedApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        if let EventPayload::BookingRejected { reason } = &event.payload {
            snapshot.status = BookingStatus::Rejected;
            snapshot.rejection_reason = Some(reason.clone());
            snapshot.updated_at = event.timestamp;
            snapshot.last_sequence = event.sequence;
        }
    }
}

/// BookingCancelled applier
pub struct BookingCancelledApplier;

impl EventApplier for BookingCancelledApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        snapshot.status = BookingStatus::Cancelled;
        snapshot.updated_at = event.timestamp;
        snapshot.last_sequence = event.sequence;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::booking::BookingEventType;

    #[test]
    fn test_rejected_records_reason() {
        let mut snapshot = BookingSnapshot::new("b-1".to_string());
        let event = BookingEvent::new(
            2,
            "b-1".to_string(),
            "admin-1".to_string(),
            "Admin".to_string(),
            "cmd-2".to_string(),
            None,
            BookingEventType::BookingRejected,
            EventPayload::BookingRejected {
                reason: "outside service area".to_string(),
            },
        );
        BookingRejectedApplier.apply(&mut snapshot, &event);
        assert_eq!(snapshot.status, BookingStatus::Rejected);
        assert_eq!(
            snapshot.rejection_reason.as_deref(),
            Some("outside service area")
        );
        assert_eq!(snapshot.last_sequence, 2);
    }
}
