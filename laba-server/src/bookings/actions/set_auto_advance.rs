//! SetAutoAdvance command handler
//!
//! Toggles whether timer expiry advances this order automatically.
//! Off by default: a human decides unless the shop opts the order in.

use async_trait::async_trait;

use crate::bookings::traits::{BookingError, CommandContext, CommandHandler, CommandMetadata};
use shared::booking::{BookingEvent, BookingEventType, EventPayload};

/// SetAutoAdvance action
#[derive(Debug, Clone)]
pub struct SetAutoAdvanceAction {
    pub booking_id: String,
    pub enabled: bool,
}

#[async_trait]
impl CommandHandler for SetAutoAdvanceAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        let snapshot = ctx.load_snapshot(&self.booking_id)?;

        if snapshot.is_deleted {
            return Err(BookingError::InvalidState(format!(
                "Booking {} is deleted",
                self.booking_id
            )));
        }
        if snapshot.status.is_terminal() {
            return Err(BookingError::InvalidTransition(format!(
                "Cannot toggle auto-advance on booking {} in status {}",
                self.booking_id, snapshot.status
            )));
        }

        // Toggling to the current value is a no-op
        if snapshot.auto_advance_enabled == self.enabled {
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
            BookingEventType::AutoAdvanceToggled,
            EventPayload::AutoAdvanceToggled {
                enabled: self.enabled,
            },
        )])
    }
}
