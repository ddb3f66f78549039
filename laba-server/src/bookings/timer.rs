//! Stage timer helpers
//!
//! Timers are derived data: the applier stores the stage entry time and
//! fixed duration, and remaining time is always recomputed from the
//! wall clock. Nothing counts down in memory, so timers survive
//! restarts unchanged.

use shared::booking::{BookingSnapshot, BookingStatus, TimerState};

/// Timer for a freshly entered stage
pub fn start_timer(entered_at: i64, duration_ms: i64) -> TimerState {
    TimerState {
        start_time: entered_at,
        duration_ms,
        is_active: true,
    }
}

/// Apply the timer consequence of entering `status` at `entered_at`
///
/// Timed stages get a fresh timer; everything else clears it.
pub fn on_stage_entered(
    snapshot: &mut BookingSnapshot,
    status: BookingStatus,
    entered_at: i64,
    duration_ms: Option<i64>,
) {
    snapshot.timer = match duration_ms {
        Some(ms) if status.is_timed() => Some(start_timer(entered_at, ms)),
        _ => None,
    };
}

/// Whether this order's timer has expired and auto-advance should fire
pub fn is_due_for_auto_advance(snapshot: &BookingSnapshot, now: i64) -> bool {
    snapshot.auto_advance_enabled
        && !snapshot.is_deleted
        && snapshot.status.is_timed()
        && snapshot.timer.is_some_and(|t| t.is_expired(now))
}
