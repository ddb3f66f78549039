//! SubmitPaymentProof command handler
//!
//! Customer uploads a GCash reference and screenshot. Moves payment
//! from Unpaid to GcashPending; an admin then approves or rejects the
//! proof. Only meaningful for GCash bookings.

use async_trait::async_trait;

use crate::bookings::traits::{BookingError, CommandContext, CommandHandler, CommandMetadata};
use shared::booking::{
    BookingEvent, BookingEventType, EventPayload, PaymentMethod, PaymentStatus,
};

/// SubmitPaymentProof action
#[derive(Debug, Clone)]
pub struct SubmitPaymentProofAction {
    pub booking_id: String,
    pub reference: String,
    pub proof_image: String,
}

#[async_trait]
impl CommandHandler for SubmitPaymentProofAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        if self.reference.trim().is_empty() {
            return Err(BookingError::InvalidSelection(
                "GCash reference is required".to_string(),
            ));
        }

        let snapshot = ctx.load_snapshot(&self.booking_id)?;

        if snapshot.is_deleted {
            return Err(BookingError::InvalidState(format!(
                "Booking {} is deleted",
                self.booking_id
            )));
        }
        if snapshot.payment.method != PaymentMethod::Gcash {
            return Err(BookingError::InvalidState(format!(
                "Booking {} does not pay via GCash",
                self.booking_id
            )));
        }
        // Resubmission after a rejected proof starts from Unpaid again
        if snapshot.payment.status != PaymentStatus::Unpaid {
            return Err(BookingError::InvalidState(format!(
                "Booking {} payment is {:?}, proof not accepted",
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
            BookingEventType::PaymentProofSubmitted,
            EventPayload::PaymentProofSubmitted {
                reference: self.reference.clone(),
                proof_image: self.proof_image.clone(),
            },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::storage::BookingStorage;
    use shared::booking::{BookingSnapshot, BookingStatus};

    fn test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor_id: "cust-1".to_string(),
            actor_name: "Maria Santos".to_string(),
            timestamp: 1234567890,
        }
    }

    fn setup(method: PaymentMethod, status: PaymentStatus) -> BookingStorage {
        let storage = BookingStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut snap = BookingSnapshot::new("b-1".to_string());
        snap.status = BookingStatus::Pending;
        snap.payment.method = method;
        snap.payment.status = status;
        storage.store_snapshot(&txn, &snap).unwrap();
        txn.commit().unwrap();
        storage
    }

    fn action() -> SubmitPaymentProofAction {
        SubmitPaymentProofAction {
            booking_id: "b-1".to_string(),
            reference: "GC-20260501-777".to_string(),
            proof_image: "proofs/b-1.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_proof_accepted_from_unpaid_gcash() {
        let storage = setup(PaymentMethod::Gcash, PaymentStatus::Unpaid);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let events = action().execute(&mut ctx, &test_metadata()).await.unwrap();
        assert_eq!(events[0].event_type, BookingEventType::PaymentProofSubmitted);
    }

    #[tokio::test]
    async fn test_proof_rejected_for_cash_booking() {
        let storage = setup(PaymentMethod::Cash, PaymentStatus::Unpaid);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = action().execute(&mut ctx, &test_metadata()).await;
        assert!(matches!(result, Err(BookingError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_proof_rejected_while_pending_review() {
        let storage = setup(PaymentMethod::Gcash, PaymentStatus::GcashPending);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = action().execute(&mut ctx, &test_metadata()).await;
        assert!(matches!(result, Err(BookingError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_proof_rejected_when_already_paid() {
        let storage = setup(PaymentMethod::Gcash, PaymentStatus::Paid);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = action().execute(&mut ctx, &test_metadata()).await;
        assert!(matches!(result, Err(BookingError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_blank_reference_fails() {
        let storage = setup(PaymentMethod::Gcash, PaymentStatus::Unpaid);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let mut a = action();
        a.reference = "   ".to_string();
        let result = a.execute(&mut ctx, &test_metadata()).await;
        assert!(matches!(result, Err(BookingError::InvalidSelection(_))));
    }
}
