//! Shared types for booking event sourcing

use super::catalog::{AddOnService, Barangay, MainService};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Service Selection
// ============================================================================

/// Pickup-only or pickup with delivery back to the customer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceOption {
    #[default]
    PickupOnly,
    PickupAndDelivery,
}

/// Fixed pickup windows offered by the shop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PickupWindow {
    /// 8:00 - 11:00 AM
    #[default]
    Morning,
    /// 1:00 - 4:00 PM
    Afternoon,
}

impl PickupWindow {
    pub fn label(&self) -> &'static str {
        match self {
            PickupWindow::Morning => "8:00 AM - 11:00 AM",
            PickupWindow::Afternoon => "1:00 PM - 4:00 PM",
        }
    }
}

/// The customer's chosen services for one booking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSelection {
    /// Exactly one main service
    pub main_service: MainService,
    /// Zero or more add-ons
    #[serde(default)]
    pub add_ons: Vec<AddOnService>,
    /// Number of loads, >= 1
    pub load_count: u32,
}

// ============================================================================
// Customer
// ============================================================================

/// Structured address; barangay is mandatory and drives delivery fees
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Address {
    pub street: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_lot: Option<String>,
    pub barangay: Barangay,
}

/// Customer contact details captured at submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, Validate)]
pub struct CustomerInfo {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
    #[validate(length(min = 7, max = 20))]
    pub contact_number: String,
    #[validate(email)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address: Address,
}

// ============================================================================
// Payment
// ============================================================================

/// Payment method chosen at booking time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Gcash,
    Card,
}

/// Payment status, orthogonal to fulfillment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    GcashPending,
    Paid,
}

/// Admin decision on a submitted GCash proof
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentDecision {
    Approved,
    Rejected,
}

// ============================================================================
// Command Response
// ============================================================================

/// Command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// The command ID this responds to
    pub command_id: String,
    /// Whether the command succeeded
    pub success: bool,
    /// New booking ID (only for SubmitBooking)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    /// Error details if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    pub fn success(command_id: String, booking_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            booking_id,
            error: None,
        }
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            command_id,
            success: false,
            booking_id: None,
            error: Some(error),
        }
    }

    pub fn duplicate(command_id: String) -> Self {
        Self {
            command_id,
            success: true,
            booking_id: None,
            error: None,
        }
    }
}

/// Command error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    pub code: CommandErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: CommandErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Command error codes
///
/// Every rejected operation maps to one of these so the caller can show
/// an accurate message; nothing is silently swallowed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandErrorCode {
    BookingNotFound,
    /// Missing/invalid service or address fields - fix and resubmit
    InvalidSelection,
    /// Pickup date full - offer alternate dates, do not retry
    CapacityExceeded,
    /// Illegal status change requested - surfaced, never coerced
    InvalidTransition,
    /// Lost the race on a transition - refetch and retry once
    ConcurrentModification,
    /// Payment action attempted from the wrong payment state
    InvalidState,
    DuplicateCommand,
    InternalError,
    // Storage errors
    StorageFull,
    OutOfMemory,
    StorageCorrupted,
    SystemBusy,
}

/// Per-date remaining-slot info for the booking calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateBookingCount {
    /// Pickup date, YYYY-MM-DD
    pub date: String,
    /// Active (non-deleted, non-rejected, non-cancelled) bookings
    pub count: u32,
    /// Whether a new booking for this date would be accepted
    pub available: bool,
}
