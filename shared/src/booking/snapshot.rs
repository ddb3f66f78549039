//! Booking snapshot - computed state from the event stream
//!
//! One snapshot per BookingOrder, the single source of truth for
//! lifecycle position. Recomputed incrementally by event appliers and
//! fully rebuildable by replaying the event stream.

use super::catalog::AddOnService;
use super::types::{
    CustomerInfo, PaymentMethod, PaymentStatus, PickupWindow, ServiceOption, ServiceSelection,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fulfillment status - the closed set of lifecycle positions
///
/// `PendingBooking`/`Approved`/`Rejected` form the booking region;
/// `Pending` through `Completed` the order region. `Cancelled` is the
/// customer-cancel terminal; soft-delete is an orthogonal flag on the
/// snapshot, not a status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    PendingBooking,
    Approved,
    Rejected,
    Pending,
    Washing,
    Drying,
    Folding,
    Ready,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Statuses that carry a processing timer
    pub fn is_timed(&self) -> bool {
        matches!(
            self,
            BookingStatus::Washing | BookingStatus::Drying | BookingStatus::Folding
        )
    }

    /// Terminal statuses - no further fulfillment transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Rejected | BookingStatus::Completed | BookingStatus::Cancelled
        )
    }

    /// Next stage in the fixed processing progression, if any
    ///
    /// `Ready` deliberately maps to `Completed`: advancing from ready
    /// and explicitly completing are the same transition.
    pub fn next_stage(&self) -> Option<BookingStatus> {
        match self {
            BookingStatus::Pending => Some(BookingStatus::Washing),
            BookingStatus::Washing => Some(BookingStatus::Drying),
            BookingStatus::Drying => Some(BookingStatus::Folding),
            BookingStatus::Folding => Some(BookingStatus::Ready),
            BookingStatus::Ready => Some(BookingStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingStatus::PendingBooking => "PENDING_BOOKING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Pending => "PENDING",
            BookingStatus::Washing => "WASHING",
            BookingStatus::Drying => "DRYING",
            BookingStatus::Folding => "FOLDING",
            BookingStatus::Ready => "READY",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// Persisted price breakdown
///
/// A snapshot, not a live formula: recomputed and re-persisted whenever
/// a contributing field changes, so historical totals stay stable after
/// admin-set add-on prices are finalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PricingSnapshot {
    /// main service unit price * load count
    pub main_service_price: f64,
    /// Recorded price per selected add-on (0 = not yet priced)
    #[serde(default)]
    pub add_on_prices: HashMap<AddOnService, f64>,
    /// Resolved delivery fee (charged only with delivery)
    pub delivery_fee: f64,
    pub total_price: f64,
}

/// Wall-clock processing timer
///
/// Remaining time is recomputed from elapsed time, never counted down by
/// a running process, so it survives restarts: any component holding the
/// persisted `start_time` can recompute it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimerState {
    /// Unix millis when the current stage was entered
    pub start_time: i64,
    /// Fixed stage duration in millis
    pub duration_ms: i64,
    pub is_active: bool,
}

impl TimerState {
    /// Remaining millis at `now`, floored at 0
    pub fn remaining(&self, now: i64) -> i64 {
        (self.duration_ms - (now - self.start_time)).max(0)
    }

    /// Whether the stage deadline has passed at `now`
    pub fn is_expired(&self, now: i64) -> bool {
        self.is_active && self.remaining(now) == 0
    }
}

/// Payment state, orthogonal to fulfillment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PaymentState {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// GCash reference ID, present only while a proof is on file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_reference: Option<String>,
    /// Opaque reference to the uploaded proof image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_image: Option<String>,
}

/// Booking snapshot - the unified BookingOrder record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingSnapshot {
    /// Booking ID (assigned by server at submission)
    pub booking_id: String,
    /// Human-facing booking number (LBA<yyyymmdd><counter>)
    pub booking_number: String,
    pub status: BookingStatus,
    pub customer: CustomerInfo,
    pub selection: ServiceSelection,
    pub service_option: ServiceOption,
    pub pickup_date: NaiveDate,
    pub pickup_window: PickupWindow,
    pub pricing: PricingSnapshot,
    pub payment: PaymentState,
    /// Present iff status is a timed processing stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerState>,
    /// When true, timer expiry advances the order automatically
    #[serde(default)]
    pub auto_advance_enabled: bool,
    /// Present iff status == Rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Soft-delete markers; a deleted record remains restorable
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved_to_history_at: Option<i64>,
    /// Last applied event sequence (for incremental updates)
    pub last_sequence: u64,
}

impl BookingSnapshot {
    /// Create a new empty booking record
    pub fn new(booking_id: String) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            booking_id,
            booking_number: String::new(),
            status: BookingStatus::PendingBooking,
            customer: CustomerInfo::default(),
            selection: ServiceSelection {
                main_service: super::catalog::MainService::WashDryFold,
                add_ons: Vec::new(),
                load_count: 1,
            },
            service_option: ServiceOption::PickupOnly,
            pickup_date: NaiveDate::default(),
            pickup_window: PickupWindow::Morning,
            pricing: PricingSnapshot::default(),
            payment: PaymentState::default(),
            timer: None,
            auto_advance_enabled: false,
            rejection_reason: None,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
            moved_to_history_at: None,
            last_sequence: 0,
        }
    }

    /// Whether this record occupies a pickup slot for its date
    ///
    /// Capacity counts non-deleted records whose status is not
    /// Rejected/Cancelled; completed records keep their slot until
    /// deleted or purged.
    pub fn counts_toward_capacity(&self) -> bool {
        !self.is_deleted
            && !matches!(
                self.status,
                BookingStatus::Rejected | BookingStatus::Cancelled
            )
    }

    /// Whether the record belongs in the history archive
    ///
    /// Derived, never invoked directly by callers: completed+paid or
    /// soft-deleted records are archived as a side effect.
    pub fn is_archivable(&self) -> bool {
        self.is_deleted
            || (self.status == BookingStatus::Completed
                && self.payment.status == PaymentStatus::Paid)
    }

    pub fn is_completed(&self) -> bool {
        self.status == BookingStatus::Completed
    }
}

impl Default for BookingSnapshot {
    fn default() -> Self {
        Self::new(String::new())
    }
}
