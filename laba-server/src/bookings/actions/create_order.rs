//! CreateOrder command handler
//!
//! Moves an approved booking into fulfillment: Approved -> Pending.
//! The laundry is considered collected from this point on.

use async_trait::async_trait;

use crate::bookings::traits::{BookingError, CommandContext, CommandHandler, CommandMetadata};
use shared::booking::{BookingEvent, BookingEventType, BookingStatus, EventPayload};

/// CreateOrder action
#[derive(Debug, Clone)]
pub struct CreateOrderAction {
    pub booking_id: String,
}

#[async_trait]
impl CommandHandler for CreateOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        let snapshot = ctx.load_snapshot(&self.booking_id)?;
        // A retried create finds the order already at Pending: no-op
        if snapshot.status == BookingStatus::Pending {
            return Ok(vec![]);
        }
        if snapshot.status != BookingStatus::Approved {
            return Err(BookingError::InvalidTransition(format!(
                "Cannot create order for booking {} in status {}",
                self.booking_id, snapshot.status
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
            BookingEventType::OrderCreated,
            EventPayload::OrderCreated {},
        )])
    }
}
