//! BookingSubmitted event applier
//!
//! Applies the BookingSubmitted event to create initial snapshot state.

use crate::bookings::traits::EventApplier;
use shared::booking::{
    BookingEvent, BookingSnapshot, BookingStatus, EventPayload, PaymentState, PaymentStatus,
};

/// BookingSubmitted applier
pub struct BookingSubmittedApplier;

impl EventApplier for BookingSubmittedApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        if let EventPayload::BookingSubmitted {
            booking_number,
            customer,
            selection,
            service_option,
            pickup_date,
            pickup_window,
            payment_method,
            pricing,
        } = &event.payload
        {
            // Set booking_id from event (important for replay scenarios)
            snapshot.booking_id = event.booking_id.clone();
            snapshot.booking_number = booking_number.clone();
            snapshot.status = BookingStatus::PendingBooking;
            snapshot.customer = customer.clone();
            snapshot.selection = selection.clone();
            snapshot.service_option = *service_option;
            snapshot.pickup_date = *pickup_date;
            snapshot.pickup_window = *pickup_window;
            snapshot.pricing = pricing.clone();
            snapshot.payment = PaymentState {
                method: *payment_method,
                status: PaymentStatus::Unpaid,
                proof_reference: None,
                proof_image: None,
            };
            snapshot.created_at = event.timestamp;
            snapshot.updated_at = event.timestamp;
            snapshot.last_sequence = event.sequence;
        }
    }
}
