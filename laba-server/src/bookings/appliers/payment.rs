//! Payment appliers - proof submission, decision, manual marking

use crate::bookings::traits::EventApplier;
use shared::booking::{
    BookingEvent, BookingSnapshot, EventPayload, PaymentDecision, PaymentStatus,
};

/// PaymentProofSubmitted applier
pub struct PaymentProofSubmittedApplier;

impl EventApplier for PaymentProofSubmittedApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        if let EventPayload::PaymentProofSubmitted {
            reference,
            proof_image,
        } = &event.payload
        {
            snapshot.payment.status = PaymentStatus::GcashPending;
            snapshot.payment.proof_reference = Some(reference.clone());
            snapshot.payment.proof_image = Some(proof_image.clone());
            snapshot.updated_at = event.timestamp;
            snapshot.last_sequence = event.sequence;
        }
    }
}

/// PaymentDecided applier
///
/// Approval keeps the reference for the audit trail. Rejection clears
/// the proof fields so the customer can submit a fresh one.
pub struct PaymentDecidedApplier;

impl EventApplier for PaymentDecidedApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        if let EventPayload::PaymentDecided { decision } = &event.payload {
            match decision {
                PaymentDecision::Approved => {
                    snapshot.payment.status = PaymentStatus::Paid;
                }
                PaymentDecision::Rejected => {
                    snapshot.payment.status = PaymentStatus::Unpaid;
                    snapshot.payment.proof_reference = None;
                    snapshot.payment.proof_image = None;
                }
            }
            snapshot.updated_at = event.timestamp;
            snapshot.last_sequence = event.sequence;
        }
    }
}

/// PaymentMarked applier - manual cash/card override
pub struct PaymentMarkedApplier;

impl EventApplier for PaymentMarkedApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        if let EventPayload::PaymentMarked { status } = &event.payload {
            snapshot.payment.status = *status;
            snapshot.updated_at = event.timestamp;
            snapshot.last_sequence = event.sequence;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::booking::BookingEventType;

    fn proof_event(seq: u64) -> BookingEvent {
        BookingEvent::new(
            seq,
            "b-1".to_string(),
            "cust-1".to_string(),
            "Maria Santos".to_string(),
            format!("cmd-{}", seq),
            None,
            BookingEventType::PaymentProofSubmitted,
            EventPayload::PaymentProofSubmitted {
                reference: "GC-777".to_string(),
                proof_image: "proofs/b-1.jpg".to_string(),
            },
        )
    }

    fn decision_event(seq: u64, decision: PaymentDecision) -> BookingEvent {
        BookingEvent::new(
            seq,
            "b-1".to_string(),
            "admin-1".to_string(),
            "Admin".to_string(),
            format!("cmd-{}", seq),
            None,
            BookingEventType::PaymentDecided,
            EventPayload::PaymentDecided { decision },
        )
    }

    #[test]
    fn test_proof_then_approval_marks_paid_keeping_reference() {
        let mut snapshot = BookingSnapshot::new("b-1".to_string());
        PaymentProofSubmittedApplier.apply(&mut snapshot, &proof_event(1));
        assert_eq!(snapshot.payment.status, PaymentStatus::GcashPending);

        PaymentDecidedApplier.apply(&mut snapshot, &decision_event(2, PaymentDecision::Approved));
        assert_eq!(snapshot.payment.status, PaymentStatus::Paid);
        assert_eq!(snapshot.payment.proof_reference.as_deref(), Some("GC-777"));
    }

    #[test]
    fn test_proof_rejection_clears_proof_for_resubmission() {
        let mut snapshot = BookingSnapshot::new("b-1".to_string());
        PaymentProofSubmittedApplier.apply(&mut snapshot, &proof_event(1));
        PaymentDecidedApplier.apply(&mut snapshot, &decision_event(2, PaymentDecision::Rejected));

        assert_eq!(snapshot.payment.status, PaymentStatus::Unpaid);
        assert!(snapshot.payment.proof_reference.is_none());
        assert!(snapshot.payment.proof_image.is_none());
    }
}
