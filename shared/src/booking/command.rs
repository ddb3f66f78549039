//! Booking commands - requests from clients/admins to mutate bookings

use super::catalog::AddOnService;
use super::snapshot::BookingStatus;
use super::types::{
    CustomerInfo, PaymentDecision, PaymentMethod, PickupWindow, ServiceOption, ServiceSelection,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Booking command envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCommand {
    /// Client-generated unique ID, used for idempotency
    pub command_id: String,
    /// Who issued the command (customer or admin)
    pub actor_id: String,
    /// Actor name (snapshot for audit)
    pub actor_name: String,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub payload: BookingCommandPayload,
}

impl BookingCommand {
    pub fn new(
        actor_id: impl Into<String>,
        actor_name: impl Into<String>,
        payload: BookingCommandPayload,
    ) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            actor_id: actor_id.into(),
            actor_name: actor_name.into(),
            timestamp: crate::util::now_millis(),
            payload,
        }
    }
}

/// Command payload variants - one per engine operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingCommandPayload {
    // ========== Booking Region ==========
    SubmitBooking {
        customer: CustomerInfo,
        selection: ServiceSelection,
        service_option: ServiceOption,
        pickup_date: NaiveDate,
        pickup_window: PickupWindow,
        payment_method: PaymentMethod,
    },

    ApproveBooking {
        booking_id: String,
    },

    RejectBooking {
        booking_id: String,
        reason: String,
    },

    /// Customer cancel - legal only while still PendingBooking
    CancelBooking {
        booking_id: String,
    },

    // ========== Order Region ==========
    /// Approved booking enters fulfillment (Approved -> Pending)
    CreateOrder {
        booking_id: String,
    },

    AdvanceOrder {
        booking_id: String,
        /// Optimistic-concurrency guard: the status the caller observed.
        /// Mismatch by one stage is a duplicate no-op; further drift is
        /// a ConcurrentModification error.
        #[serde(skip_serializing_if = "Option::is_none")]
        expected_status: Option<BookingStatus>,
        /// Set by the expiry scheduler, false for admin advances
        #[serde(default)]
        auto: bool,
    },

    CompleteOrder {
        booking_id: String,
    },

    // ========== Pricing ==========
    UpdateBookingInfo {
        booking_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        selection: Option<ServiceSelection>,
        #[serde(skip_serializing_if = "Option::is_none")]
        service_option: Option<ServiceOption>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pickup_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pickup_window: Option<PickupWindow>,
    },

    /// Capture a post-inspection add-on price
    SetAddOnPrice {
        booking_id: String,
        add_on: AddOnService,
        price: f64,
    },

    // ========== Timer ==========
    SetAutoAdvance {
        booking_id: String,
        enabled: bool,
    },

    // ========== Payment ==========
    SubmitPaymentProof {
        booking_id: String,
        reference: String,
        proof_image: String,
    },

    DecidePaymentProof {
        booking_id: String,
        decision: PaymentDecision,
    },

    MarkPaid {
        booking_id: String,
    },

    MarkUnpaid {
        booking_id: String,
    },

    // ========== Archive ==========
    DeleteBooking {
        booking_id: String,
    },

    RestoreBooking {
        booking_id: String,
    },

    /// Irreversible removal of an archived record and its event stream
    PurgeBooking {
        booking_id: String,
    },
}

impl BookingCommandPayload {
    /// Target booking for commands that address an existing record
    pub fn booking_id(&self) -> Option<&str> {
        match self {
            BookingCommandPayload::SubmitBooking { .. } => None,
            BookingCommandPayload::ApproveBooking { booking_id }
            | BookingCommandPayload::RejectBooking { booking_id, .. }
            | BookingCommandPayload::CancelBooking { booking_id }
            | BookingCommandPayload::CreateOrder { booking_id }
            | BookingCommandPayload::AdvanceOrder { booking_id, .. }
            | BookingCommandPayload::CompleteOrder { booking_id }
            | BookingCommandPayload::UpdateBookingInfo { booking_id, .. }
            | BookingCommandPayload::SetAddOnPrice { booking_id, .. }
            | BookingCommandPayload::SetAutoAdvance { booking_id, .. }
            | BookingCommandPayload::SubmitPaymentProof { booking_id, .. }
            | BookingCommandPayload::DecidePaymentProof { booking_id, .. }
            | BookingCommandPayload::MarkPaid { booking_id }
            | BookingCommandPayload::MarkUnpaid { booking_id }
            | BookingCommandPayload::DeleteBooking { booking_id }
            | BookingCommandPayload::RestoreBooking { booking_id }
            | BookingCommandPayload::PurgeBooking { booking_id } => Some(booking_id),
        }
    }
}
