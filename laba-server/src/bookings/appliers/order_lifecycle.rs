//! Order lifecycle appliers - created, stage advanced, completed
//!
//! Timer state is derived here: entering a timed stage stores the
//! stage entry time and duration from the event, so replay rebuilds
//! the exact same timer regardless of current config.

use crate::bookings::timer::on_stage_entered;
use crate::bookings::traits::EventApplier;
use shared::booking::{BookingEvent, BookingSnapshot, BookingStatus, EventPayload};

/// OrderCreated applier - Approved booking enters fulfillment
pub struct OrderCreatedApplier;

impl EventApplier for OrderCreatedApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        snapshot.status = BookingStatus::Pending;
        snapshot.timer = None;
        snapshot.updated_at = event.timestamp;
        snapshot.last_sequence = event.sequence;
    }
}

/// StageAdvanced applier
pub struct StageAdvancedApplier;

impl EventApplier for StageAdvancedApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        if let EventPayload::StageAdvanced {
            to,
            stage_duration_ms,
            ..
        } = &event.payload
        {
            snapshot.status = *to;
            on_stage_entered(snapshot, *to, event.timestamp, *stage_duration_ms);
            snapshot.updated_at = event.timestamp;
            snapshot.last_sequence = event.sequence;
        }
    }
}

/// OrderCompleted applier
pub struct OrderCompletedApplier;

impl EventApplier for OrderCompletedApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent) {
        snapshot.status = BookingStatus::Completed;
        snapshot.timer = None;
        snapshot.updated_at = event.timestamp;
        snapshot.last_sequence = event.sequence;
    }
}
