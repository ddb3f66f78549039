//! Pricing appliers - info updates and add-on price capture
//!
//! Both carry the recomputed PricingSnapshot in the event, so applying
//! is a plain overwrite; no price math happens here.

use crate::bookings::traits::EventApplier;
use shared::booking::{BookingEvent, BookingSnapshot, EventPayload};

/// BookingInfoUpdated applier
pub struct BookingInfoUpdatedApplier;

impl EventApplier for BookingInfoUpdatedApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        if let EventPayload::BookingInfoUpdated {
            selection,
            service_option,
            pickup_date,
            pickup_window,
            pricing,
        } = &event.payload
        {
            if let Some(selection) = selection {
                snapshot.selection = selection.clone();
            }
            if let Some(service_option) = service_option {
                snapshot.service_option = *service_option;
            }
            if let Some(pickup_date) = pickup_date {
                snapshot.pickup_date = *pickup_date;
            }
            if let Some(pickup_window) = pickup_window {
                snapshot.pickup_window = *pickup_window;
            }
            snapshot.pricing = pricing.clone();
            snapshot.updated_at = event.timestamp;
            snapshot.last_sequence = event.sequence;
        }
    }
}

/// AddOnPriced applier
pub struct AddOnPricedApplier;

impl EventApplier for AddOnPricedApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        if let EventPayload::AddOnPriced { pricing, .. } = &event.payload {
            snapshot.pricing = pricing.clone();
            snapshot.updated_at = event.timestamp;
            snapshot.last_sequence = event.sequence;
        }
    }
}
