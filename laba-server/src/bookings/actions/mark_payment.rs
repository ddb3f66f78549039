//! MarkPaid / MarkUnpaid command handlers
//!
//! Manual payment overrides for over-the-counter cash and card. A GCash
//! proof sitting in review must be decided, not overridden.

use async_trait::async_trait;

use crate::bookings::traits::{
    BookingError, CommandContext, CommandHandler, CommandMetadata, RecordLocation,
};
use shared::booking::{BookingEvent, BookingEventType, EventPayload, PaymentStatus};

/// MarkPayment action - target is Paid or Unpaid
#[derive(Debug, Clone)]
pub struct MarkPaymentAction {
    pub booking_id: String,
    pub target: PaymentStatus,
}

#[async_trait]
impl CommandHandler for MarkPaymentAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        if self.target == PaymentStatus::GcashPending {
            return Err(BookingError::InvalidState(
                "GcashPending can only be entered by submitting a proof".to_string(),
            ));
        }

        // Archived records are settled; no payment overrides past archival
        let (snapshot, location) = ctx.load_anywhere(&self.booking_id)?;
        if location == RecordLocation::History {
            return Err(BookingError::InvalidState(format!(
                "Booking {} is archived; payment can no longer be changed",
                self.booking_id
            )));
        }

        if snapshot.payment.status == PaymentStatus::GcashPending {
            return Err(BookingError::InvalidState(format!(
                "Booking {} has a GCash proof awaiting review; decide it instead",
                self.booking_id
            )));
        }
        if snapshot.payment.status == self.target {
            return Ok(vec![]);
        }

        let seq = ctx.next_sequence();
        Ok(vec![BookingEvent::new(
            seq,
            self.booking_id.clone(),
            metadata.actor_id.clone(),
            metadata.actor_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            BookingEventType::PaymentMarked,
            EventPayload::PaymentMarked {
                status: self.target,
            },
        )])
    }
}
