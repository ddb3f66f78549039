//! DecidePaymentProof command handler
//!
//! Admin verdict on a submitted GCash proof. Approval marks the booking
//! Paid; rejection returns it to Unpaid so the customer can resubmit.

use async_trait::async_trait;

use crate::bookings::traits::{BookingError, CommandContext, CommandHandler, CommandMetadata};
use shared::booking::{
    BookingEvent, BookingEventType, EventPayload, PaymentDecision, PaymentStatus,
};

/// DecidePaymentProof action
#[derive(Debug, Clone)]
pub struct DecidePaymentProofAction {
    pub booking_id: String,
    pub decision: PaymentDecision,
}

#[async_trait]
impl CommandHandler for DecidePaymentProofAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        let snapshot = ctx.load_snapshot(&self.booking_id)?;

        // Only a proof awaiting review can be decided
        if snapshot.payment.status != PaymentStatus::GcashPending {
            return Err(BookingError::InvalidState(format!(
                "Booking {} has no pending payment proof (payment is {:?})",
                self.booking_id, snapshot.payment.status
            )));
        }

        let seq = ctx.next_sequence();
        Ok(vec![BookingEvent::new(
            seq,
            self.booking_id.clone(),
            metadata.actor_id.clone(),
            metadata.actor_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            BookingEventType::PaymentDecided,
            EventPayload::PaymentDecided {
                decision: self.decision,
            },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::storage::BookingStorage;
    use shared::booking::{BookingSnapshot, BookingStatus, PaymentMethod};

    fn test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor_id: "admin-1".to_string(),
            actor_name: "Admin".to_string(),
            timestamp: 1234567890,
        }
    }

    fn setup(payment_status: PaymentStatus) -> BookingStorage {
        let storage = BookingStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut snap = BookingSnapshot::new("b-1".to_string());
        snap.status = BookingStatus::Washing;
        snap.payment.method = PaymentMethod::Gcash;
        snap.payment.status = payment_status;
        storage.store_snapshot(&txn, &snap).unwrap();
        txn.commit().unwrap();
        storage
    }

    #[tokio::test]
    async fn test_decide_pending_proof() {
        let storage = setup(PaymentStatus::GcashPending);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = DecidePaymentProofAction {
            booking_id: "b-1".to_string(),
            decision: PaymentDecision::Approved,
        };
        let events = action.execute(&mut ctx, &test_metadata()).await.unwrap();
        assert_eq!(events[0].event_type, BookingEventType::PaymentDecided);
    }

    #[tokio::test]
    async fn test_decide_without_pending_proof_fails() {
        let storage = setup(PaymentStatus::Unpaid);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = DecidePaymentProofAction {
            booking_id: "b-1".to_string(),
            decision: PaymentDecision::Rejected,
        };
        let result = action.execute(&mut ctx, &test_metadata()).await;
        assert!(matches!(result, Err(BookingError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_decide_already_paid_fails() {
        let storage = setup(PaymentStatus::Paid);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = DecidePaymentProofAction {
            booking_id: "b-1".to_string(),
            decision: PaymentDecision::Approved,
        };
        let result = action.execute(&mut ctx, &test_metadata()).await;
        assert!(matches!(result, Err(BookingError::InvalidState(_))));
    }
}
