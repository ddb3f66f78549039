//! SubmitBooking command handler
//!
//! Creates a new booking request in PendingBooking. Validates customer
//! info and selection, enforces the daily pickup capacity, and computes
//! the initial pricing snapshot.

use async_trait::async_trait;
use chrono::NaiveDate;
use validator::Validate;

use crate::bookings::capacity::check_capacity;
use crate::bookings::traits::{BookingError, CommandContext, CommandHandler, CommandMetadata};
use crate::pricing::{compute_pricing, resolve_delivery_fee};
use crate::utils::time::date_key;
use shared::booking::{
    BookingEvent, BookingEventType, CustomerInfo, EventPayload, PaymentMethod, PickupWindow,
    ServiceOption, ServiceSelection,
};

/// SubmitBooking action
///
/// `booking_id` and `booking_number` are pre-generated by the manager
/// before the write transaction opens.
#[derive(Debug, Clone)]
pub struct SubmitBookingAction {
    pub booking_id: String,
    pub booking_number: String,
    pub customer: CustomerInfo,
    pub selection: ServiceSelection,
    pub service_option: ServiceOption,
    pub pickup_date: NaiveDate,
    pub pickup_window: PickupWindow,
    pub payment_method: PaymentMethod,
}

#[async_trait]
impl CommandHandler for SubmitBookingAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        // 1. Validate customer fields
        self.customer
            .validate()
            .map_err(|e| BookingError::InvalidSelection(e.to_string()))?;

        if self.selection.load_count < 1 {
            return Err(BookingError::InvalidSelection(
                "load_count must be at least 1".to_string(),
            ));
        }

        // 2. Capacity gate for the pickup date (atomic within this txn)
        check_capacity(ctx, &date_key(self.pickup_date))?;

        // 3. Compute the initial pricing snapshot
        let delivery_fee = resolve_delivery_fee(
            self.customer.address.barangay,
            self.selection.load_count,
        );
        let pricing = compute_pricing(
            &self.selection,
            self.service_option,
            delivery_fee,
            &std::collections::HashMap::new(),
        )
        .map_err(|e| BookingError::InvalidSelection(e.to_string()))?;

        let seq = ctx.next_sequence();
        let event = BookingEvent::new(
            seq,
            self.booking_id.clone(),
            metadata.actor_id.clone(),
            metadata.actor_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            BookingEventType::BookingSubmitted,
            EventPayload::BookingSubmitted {
                booking_number: self.booking_number.clone(),
                customer: self.customer.clone(),
                selection: self.selection.clone(),
                service_option: self.service_option,
                pickup_date: self.pickup_date,
                pickup_window: self.pickup_window,
                payment_method: self.payment_method,
                pricing,
            },
        );

        Ok(vec![event])
    }
}
