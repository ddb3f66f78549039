//! Event applier implementations
//!
//! Each applier implements the `EventApplier` trait and handles
//! one specific event type. Appliers are PURE functions.

use enum_dispatch::enum_dispatch;

use crate::bookings::traits::EventApplier;
use shared::booking::{BookingEvent, BookingSnapshot, EventPayload};

mod archive;
mod auto_advance_toggled;
mod booking_reviewed;
mod booking_submitted;
mod order_lifecycle;
mod payment;
mod pricing;

pub use archive::{BookingDeletedApplier, BookingRestoredApplier};
pub use auto_advance_toggled::AutoAdvanceToggledApplier;
pub use booking_reviewed::{
    BookingApprovedApplier, BookingCancelledApplier, BookingRejectedApplier,
};
pub use booking_submitted::BookingSubmittedApplier;
pub use order_lifecycle::{OrderCompletedApplier, OrderCreatedApplier, StageAdvancedApplier};
pub use payment::{PaymentDecidedApplier, PaymentMarkedApplier, PaymentProofSubmittedApplier};
pub use pricing::{AddOnPricedApplier, BookingInfoUpdatedApplier};

/// EventAction enum - dispatches to concrete applier implementations
///
/// Uses enum_dispatch for zero-cost static dispatch.
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    BookingSubmitted(BookingSubmittedApplier),
    BookingApproved(BookingApprovedApplier),
    BookingRejected(BookingRejectedApplier),
    BookingCancelled(BookingCancelledApplier),
    OrderCreated(OrderCreatedApplier),
    StageAdvanced(StageAdvancedApplier),
    OrderCompleted(OrderCompletedApplier),
    BookingInfoUpdated(BookingInfoUpdatedApplier),
    AddOnPriced(AddOnPricedApplier),
    AutoAdvanceToggled(AutoAdvanceToggledApplier),
    PaymentProofSubmitted(PaymentProofSubmittedApplier),
    PaymentDecided(PaymentDecidedApplier),
    PaymentMarked(PaymentMarkedApplier),
    BookingDeleted(BookingDeletedApplier),
    BookingRestored(BookingRestoredApplier),
}

/// Convert BookingEvent reference to EventAction
///
/// This is the ONLY place with a match on EventPayload.
impl From<&BookingEvent> for EventAction {
    fn from(event: &BookingEvent) -> Self {
        match &event.payload {
            EventPayload::BookingSubmitted { .. } => {
                EventAction::BookingSubmitted(BookingSubmittedApplier)
            }
            EventPayload::BookingApproved {} => {
                EventAction::BookingApproved(BookingApprovedApplier)
            }
            EventPayload::BookingRejected { .. } => {
                EventAction::BookingRejected(BookingRejectedApplier)
            }
            EventPayload::BookingCancelled {} => {
                EventAction::BookingCancelled(BookingCancelledApplier)
            }
            EventPayload::OrderCreated {} => EventAction::OrderCreated(OrderCreatedApplier),
            EventPayload::StageAdvanced { .. } => {
                EventAction::StageAdvanced(StageAdvancedApplier)
            }
            EventPayload::OrderCompleted { .. } => {
                EventAction::OrderCompleted(OrderCompletedApplier)
            }
            EventPayload::BookingInfoUpdated { .. } => {
                EventAction::BookingInfoUpdated(BookingInfoUpdatedApplier)
            }
            EventPayload::AddOnPriced { .. } => EventAction::AddOnPriced(AddOnPricedApplier),
            EventPayload::AutoAdvanceToggled { .. } => {
                EventAction::AutoAdvanceToggled(AutoAdvanceToggledApplier)
            }
            EventPayload::PaymentProofSubmitted { .. } => {
                EventAction::PaymentProofSubmitted(PaymentProofSubmittedApplier)
            }
            EventPayload::PaymentDecided { .. } => {
                EventAction::PaymentDecided(PaymentDecidedApplier)
            }
            EventPayload::PaymentMarked { .. } => {
                EventAction::PaymentMarked(PaymentMarkedApplier)
            }
            EventPayload::BookingDeleted {} => {
                EventAction::BookingDeleted(BookingDeletedApplier)
            }
            EventPayload::BookingRestored {} => {
                EventAction::BookingRestored(BookingRestoredApplier)
            }
        }
    }
}
