//! CompleteOrder command handler
//!
//! Explicit completion of a Ready order, used when the customer picks
//! the laundry up (or delivery is confirmed). Same transition as
//! advancing out of Ready.

use async_trait::async_trait;

use crate::bookings::traits::{BookingError, CommandContext, CommandHandler, CommandMetadata};
use shared::booking::{BookingEvent, BookingEventType, BookingStatus, EventPayload};

/// CompleteOrder action
#[derive(Debug, Clone)]
pub struct CompleteOrderAction {
    pub booking_id: String,
}

#[async_trait]
impl CommandHandler for CompleteOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        let snapshot = ctx.load_snapshot(&self.booking_id)?;

        // A retried completion finds the order already Completed: no-op
        if snapshot.status == BookingStatus::Completed {
            return Ok(vec![]);
        }
        if snapshot.status != BookingStatus::Ready {
            return Err(BookingError::InvalidTransition(format!(
                "Cannot complete booking {} in status {}",
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
            BookingEventType::OrderCompleted,
            EventPayload::OrderCompleted {
                total_price: snapshot.pricing.total_price,
            },
        )])
    }
}
