//! DeleteBooking command handler
//!
//! Soft delete. The record keeps its full event history and moves to
//! the archive; only PurgeBooking removes data for good.

use async_trait::async_trait;

use crate::bookings::traits::{BookingError, CommandContext, CommandHandler, CommandMetadata};
use shared::booking::{BookingEvent, BookingEventType, EventPayload};

/// DeleteBooking action
#[derive(Debug, Clone)]
pub struct DeleteBookingAction {
    pub booking_id: String,
}

#[async_trait]
impl CommandHandler for DeleteBookingAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        // Archived completed records are deletable too, so they can be
        // purged and their pickup slot released
        let (snapshot, _location) = ctx.load_anywhere(&self.booking_id)?;

        if snapshot.is_deleted {
            return Err(BookingError::InvalidState(format!(
                "Booking {} is already deleted",
                self.booking_id
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
            BookingEventType::BookingDeleted,
            EventPayload::BookingDeleted {},
        )])
    }
}
