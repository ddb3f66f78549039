//! SetAddOnPrice command handler
//!
//! Records the real price of an inspection-priced add-on (dry cleaning,
//! ironing) after the admin has seen the garments. Recomputes the
//! pricing snapshot with the captured price.

use async_trait::async_trait;

use crate::bookings::traits::{BookingError, CommandContext, CommandHandler, CommandMetadata};
use crate::pricing::{compute_pricing, money::is_valid_price, resolve_delivery_fee};
use shared::booking::{AddOnService, BookingEvent, BookingEventType, EventPayload};

/// SetAddOnPrice action
#[derive(Debug, Clone)]
pub struct SetAddOnPriceAction {
    pub booking_id: String,
    pub add_on: AddOnService,
    pub price: f64,
}

#[async_trait]
impl CommandHandler for SetAddOnPriceAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        if !is_valid_price(self.price) {
            return Err(BookingError::InvalidSelection(format!(
                "Invalid add-on price: {}",
                self.price
            )));
        }

        let snapshot = ctx.load_snapshot(&self.booking_id)?;

        if snapshot.is_deleted {
            return Err(BookingError::InvalidState(format!(
                "Booking {} is deleted",
                self.booking_id
            )));
        }
        if snapshot.status.is_terminal() {
            return Err(BookingError::InvalidTransition(format!(
                "Cannot price add-ons on booking {} in status {}",
                self.booking_id, snapshot.status
            )));
        }
        if !snapshot.selection.add_ons.contains(&self.add_on) {
            return Err(BookingError::InvalidSelection(format!(
                "Add-on {} is not part of booking {}",
                self.add_on, self.booking_id
            )));
        }

        let mut recorded = snapshot.pricing.add_on_prices.clone();
        recorded.insert(self.add_on, self.price);

        let delivery_fee = resolve_delivery_fee(
            snapshot.customer.address.barangay,
            snapshot.selection.load_count,
        );
        let pricing = compute_pricing(
            &snapshot.selection,
            snapshot.service_option,
            delivery_fee,
            &recorded,
        )
        .map_err(|e| BookingError::InvalidSelection(e.to_string()))?;

        let seq = ctx.next_sequence();
        Ok(vec![BookingEvent::new(
            seq,
            self.booking_id.clone(),
            metadata.actor_id.clone(),
            metadata.actor_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            BookingEventType::AddOnPriced,
            EventPayload::AddOnPriced {
                add_on: self.add_on,
                price: self.price,
                pricing,
            },
        )])
    }
}
