//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles
//! one specific command type.

use async_trait::async_trait;

use crate::bookings::traits::{BookingError, CommandContext, CommandHandler, CommandMetadata};
use shared::booking::{BookingCommand, BookingCommandPayload, BookingEvent, PaymentStatus};

mod advance_order;
mod complete_order;
mod create_order;
mod delete_booking;
mod decide_payment_proof;
mod mark_payment;
mod restore_booking;
mod review_booking;
mod set_addon_price;
mod set_auto_advance;
mod submit_booking;
mod submit_payment_proof;
mod update_booking_info;

pub use advance_order::AdvanceOrderAction;
pub use complete_order::CompleteOrderAction;
pub use create_order::CreateOrderAction;
pub use decide_payment_proof::DecidePaymentProofAction;
pub use delete_booking::DeleteBookingAction;
pub use mark_payment::MarkPaymentAction;
pub use restore_booking::RestoreBookingAction;
pub use review_booking::{ApproveBookingAction, CancelBookingAction, RejectBookingAction};
pub use set_addon_price::SetAddOnPriceAction;
pub use set_auto_advance::SetAutoAdvanceAction;
pub use submit_booking::SubmitBookingAction;
pub use submit_payment_proof::SubmitPaymentProofAction;
pub use update_booking_info::UpdateBookingInfoAction;

/// CommandAction enum - dispatches to concrete action implementations
pub enum CommandAction {
    SubmitBooking(SubmitBookingAction),
    ApproveBooking(ApproveBookingAction),
    RejectBooking(RejectBookingAction),
    CancelBooking(CancelBookingAction),
    CreateOrder(CreateOrderAction),
    AdvanceOrder(AdvanceOrderAction),
    CompleteOrder(CompleteOrderAction),
    UpdateBookingInfo(UpdateBookingInfoAction),
    SetAddOnPrice(SetAddOnPriceAction),
    SetAutoAdvance(SetAutoAdvanceAction),
    SubmitPaymentProof(SubmitPaymentProofAction),
    DecidePaymentProof(DecidePaymentProofAction),
    MarkPayment(MarkPaymentAction),
    DeleteBooking(DeleteBookingAction),
    RestoreBooking(RestoreBookingAction),
}

/// Manual implementation of CommandHandler for CommandAction
#[async_trait]
impl CommandHandler for CommandAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        match self {
            CommandAction::SubmitBooking(action) => action.execute(ctx, metadata).await,
            CommandAction::ApproveBooking(action) => action.execute(ctx, metadata).await,
            CommandAction::RejectBooking(action) => action.execute(ctx, metadata).await,
            CommandAction::CancelBooking(action) => action.execute(ctx, metadata).await,
            CommandAction::CreateOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::AdvanceOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::CompleteOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::UpdateBookingInfo(action) => action.execute(ctx, metadata).await,
            CommandAction::SetAddOnPrice(action) => action.execute(ctx, metadata).await,
            CommandAction::SetAutoAdvance(action) => action.execute(ctx, metadata).await,
            CommandAction::SubmitPaymentProof(action) => action.execute(ctx, metadata).await,
            CommandAction::DecidePaymentProof(action) => action.execute(ctx, metadata).await,
            CommandAction::MarkPayment(action) => action.execute(ctx, metadata).await,
            CommandAction::DeleteBooking(action) => action.execute(ctx, metadata).await,
            CommandAction::RestoreBooking(action) => action.execute(ctx, metadata).await,
        }
    }
}

/// Convert BookingCommand to CommandAction
///
/// This is the ONLY place with a match on BookingCommandPayload.
impl From<&BookingCommand> for CommandAction {
    fn from(cmd: &BookingCommand) -> Self {
        match &cmd.payload {
            BookingCommandPayload::SubmitBooking { .. } => {
                // SubmitBooking is handled in BookingsManager to generate
                // booking_id/booking_number; this path should never be reached
                unreachable!("SubmitBooking must be handled by BookingsManager")
            }
            BookingCommandPayload::PurgeBooking { .. } => {
                // Purge bypasses the event pipeline entirely
                unreachable!("PurgeBooking must be handled by BookingsManager")
            }
            BookingCommandPayload::ApproveBooking { booking_id } => {
                CommandAction::ApproveBooking(ApproveBookingAction {
                    booking_id: booking_id.clone(),
                })
            }
            BookingCommandPayload::RejectBooking { booking_id, reason } => {
                CommandAction::RejectBooking(RejectBookingAction {
                    booking_id: booking_id.clone(),
                    reason: reason.clone(),
                })
            }
            BookingCommandPayload::CancelBooking { booking_id } => {
                CommandAction::CancelBooking(CancelBookingAction {
                    booking_id: booking_id.clone(),
                })
            }
            BookingCommandPayload::CreateOrder { booking_id } => {
                CommandAction::CreateOrder(CreateOrderAction {
                    booking_id: booking_id.clone(),
                })
            }
            BookingCommandPayload::AdvanceOrder {
                booking_id,
                expected_status,
                auto,
            } => CommandAction::AdvanceOrder(AdvanceOrderAction {
                booking_id: booking_id.clone(),
                expected_status: *expected_status,
                auto: *auto,
                stage_duration_ms: 0, // Injected by BookingsManager from config
            }),
            BookingCommandPayload::CompleteOrder { booking_id } => {
                CommandAction::CompleteOrder(CompleteOrderAction {
                    booking_id: booking_id.clone(),
                })
            }
            BookingCommandPayload::UpdateBookingInfo {
                booking_id,
                selection,
                service_option,
                pickup_date,
                pickup_window,
            } => CommandAction::UpdateBookingInfo(UpdateBookingInfoAction {
                booking_id: booking_id.clone(),
                selection: selection.clone(),
                service_option: *service_option,
                pickup_date: *pickup_date,
                pickup_window: *pickup_window,
            }),
            BookingCommandPayload::SetAddOnPrice {
                booking_id,
                add_on,
                price,
            } => CommandAction::SetAddOnPrice(SetAddOnPriceAction {
                booking_id: booking_id.clone(),
                add_on: *add_on,
                price: *price,
            }),
            BookingCommandPayload::SetAutoAdvance {
                booking_id,
                enabled,
            } => CommandAction::SetAutoAdvance(SetAutoAdvanceAction {
                booking_id: booking_id.clone(),
                enabled: *enabled,
            }),
            BookingCommandPayload::SubmitPaymentProof {
                booking_id,
                reference,
                proof_image,
            } => CommandAction::SubmitPaymentProof(SubmitPaymentProofAction {
                booking_id: booking_id.clone(),
                reference: reference.clone(),
                proof_image: proof_image.clone(),
            }),
            BookingCommandPayload::DecidePaymentProof {
                booking_id,
                decision,
            } => CommandAction::DecidePaymentProof(DecidePaymentProofAction {
                booking_id: booking_id.clone(),
                decision: *decision,
            }),
            BookingCommandPayload::MarkPaid { booking_id } => {
                CommandAction::MarkPayment(MarkPaymentAction {
                    booking_id: booking_id.clone(),
                    target: PaymentStatus::Paid,
                })
            }
            BookingCommandPayload::MarkUnpaid { booking_id } => {
                CommandAction::MarkPayment(MarkPaymentAction {
                    booking_id: booking_id.clone(),
                    target: PaymentStatus::Unpaid,
                })
            }
            BookingCommandPayload::DeleteBooking { booking_id } => {
                CommandAction::DeleteBooking(DeleteBookingAction {
                    booking_id: booking_id.clone(),
                })
            }
            BookingCommandPayload::RestoreBooking { booking_id } => {
                CommandAction::RestoreBooking(RestoreBookingAction {
                    booking_id: booking_id.clone(),
                })
            }
        }
    }
}
