//! Booking events - immutable facts recorded after command processing

use super::catalog::AddOnService;
use super::snapshot::{BookingStatus, PricingSnapshot};
use super::types::{
    CustomerInfo, PaymentDecision, PaymentMethod, PaymentStatus, PickupWindow, ServiceOption,
    ServiceSelection,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Booking event - immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number - the authoritative ordering for replay
    pub sequence: u64,
    /// Booking this event belongs to
    pub booking_id: String,
    /// Server timestamp (Unix milliseconds) - authoritative for state
    pub timestamp: i64,
    /// Client timestamp - audit only, may carry clock skew
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<i64>,
    /// Who triggered this event (customer or admin)
    pub actor_id: String,
    /// Actor name (snapshot for audit)
    pub actor_name: String,
    /// Command that produced this event
    pub command_id: String,
    pub event_type: BookingEventType,
    pub payload: EventPayload,
}

/// Event type enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingEventType {
    // Booking region
    BookingSubmitted,
    BookingApproved,
    BookingRejected,
    BookingCancelled,

    // Order region
    OrderCreated,
    StageAdvanced,
    OrderCompleted,

    // Pricing
    BookingInfoUpdated,
    AddOnPriced,

    // Timer
    AutoAdvanceToggled,

    // Payment
    PaymentProofSubmitted,
    PaymentDecided,
    PaymentMarked,

    // Archive
    BookingDeleted,
    BookingRestored,
}

impl std::fmt::Display for BookingEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingEventType::BookingSubmitted => "BOOKING_SUBMITTED",
            BookingEventType::BookingApproved => "BOOKING_APPROVED",
            BookingEventType::BookingRejected => "BOOKING_REJECTED",
            BookingEventType::BookingCancelled => "BOOKING_CANCELLED",
            BookingEventType::OrderCreated => "ORDER_CREATED",
            BookingEventType::StageAdvanced => "STAGE_ADVANCED",
            BookingEventType::OrderCompleted => "ORDER_COMPLETED",
            BookingEventType::BookingInfoUpdated => "BOOKING_INFO_UPDATED",
            BookingEventType::AddOnPriced => "ADD_ON_PRICED",
            BookingEventType::AutoAdvanceToggled => "AUTO_ADVANCE_TOGGLED",
            BookingEventType::PaymentProofSubmitted => "PAYMENT_PROOF_SUBMITTED",
            BookingEventType::PaymentDecided => "PAYMENT_DECIDED",
            BookingEventType::PaymentMarked => "PAYMENT_MARKED",
            BookingEventType::BookingDeleted => "BOOKING_DELETED",
            BookingEventType::BookingRestored => "BOOKING_RESTORED",
        };
        write!(f, "{}", s)
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    // ========== Booking Region ==========
    BookingSubmitted {
        /// Server-generated booking number (always present)
        booking_number: String,
        customer: CustomerInfo,
        selection: ServiceSelection,
        service_option: ServiceOption,
        pickup_date: NaiveDate,
        pickup_window: PickupWindow,
        payment_method: PaymentMethod,
        /// Price snapshot computed at submission
        pricing: PricingSnapshot,
    },

    BookingApproved {},

    BookingRejected {
        reason: String,
    },

    BookingCancelled {},

    // ========== Order Region ==========
    /// Approved booking enters fulfillment as an order
    OrderCreated {},

    StageAdvanced {
        from: BookingStatus,
        to: BookingStatus,
        /// Whether a timer expiry triggered this advance
        #[serde(default)]
        auto: bool,
        /// Stage duration when `to` is a timed status; replay uses this
        /// rather than live config so rebuilt snapshots are identical
        #[serde(skip_serializing_if = "Option::is_none")]
        stage_duration_ms: Option<i64>,
    },

    OrderCompleted {
        total_price: f64,
    },

    // ========== Pricing ==========
    BookingInfoUpdated {
        #[serde(skip_serializing_if = "Option::is_none")]
        selection: Option<ServiceSelection>,
        #[serde(skip_serializing_if = "Option::is_none")]
        service_option: Option<ServiceOption>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pickup_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pickup_window: Option<PickupWindow>,
        /// Recomputed snapshot, persisted with the change
        pricing: PricingSnapshot,
    },

    /// Admin captured a post-inspection add-on price
    AddOnPriced {
        add_on: AddOnService,
        price: f64,
        pricing: PricingSnapshot,
    },

    // ========== Timer ==========
    AutoAdvanceToggled {
        enabled: bool,
    },

    // ========== Payment ==========
    PaymentProofSubmitted {
        reference: String,
        proof_image: String,
    },

    PaymentDecided {
        decision: PaymentDecision,
    },

    /// Manual admin override for cash/card
    PaymentMarked {
        status: PaymentStatus,
    },

    // ========== Archive ==========
    BookingDeleted {},

    BookingRestored {},
}

impl BookingEvent {
    /// Create a new event; the server timestamp is always set here
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        booking_id: String,
        actor_id: String,
        actor_name: String,
        command_id: String,
        client_timestamp: Option<i64>,
        event_type: BookingEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            booking_id,
            timestamp: chrono::Utc::now().timestamp_millis(),
            client_timestamp,
            actor_id,
            actor_name,
            command_id,
            event_type,
            payload,
        }
    }
}
