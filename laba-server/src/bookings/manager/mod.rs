//! BookingsManager - command processing and event generation
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Idempotency check (command_id)
//!     ├─ 2. Pre-generate booking_id/number (SubmitBooking only)
//!     ├─ 3. Begin write transaction
//!     ├─ 4. Convert command to action and execute
//!     ├─ 5. Apply events to snapshots via EventApplier
//!     ├─ 6. Persist events, snapshots, date index; archive if due
//!     ├─ 7. Mark command processed
//!     ├─ 8. Commit transaction
//!     ├─ 9. Broadcast event(s)
//!     └─ 10. Return response
//! ```
//!
//! Archival is derived, never commanded: after appliers run, any
//! snapshot that is soft-deleted or completed-and-paid moves to the
//! history table in the same transaction. PurgeBooking is the one
//! command handled outside the event pipeline, because its whole point
//! is removing the event stream.

mod error;
pub use error::*;

use super::actions::{AdvanceOrderAction, CommandAction, SubmitBookingAction};
use super::appliers::EventAction;
use super::capacity::DAILY_PICKUP_CAPACITY;
use super::reducer;
use super::storage::{BookingStorage, StorageError};
use super::timer::is_due_for_auto_advance;
use super::traits::{
    CommandContext, CommandHandler, CommandMetadata, EventApplier, RecordLocation,
};
use crate::utils::time::{date_key, number_date_stamp};
use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::booking::{
    BookingCommand, BookingCommandPayload, BookingEvent, BookingSnapshot, BookingStatus,
    CommandResponse, DateBookingCount,
};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// BookingsManager for command processing
///
/// The `epoch` field is a unique identifier generated on each startup.
/// Clients use it to detect server restarts and trigger full resync.
pub struct BookingsManager {
    storage: BookingStorage,
    event_tx: broadcast::Sender<BookingEvent>,
    /// Server instance epoch - unique ID generated on startup
    epoch: String,
    /// Business timezone (booking numbers, "today")
    tz: Tz,
    /// Fixed duration of each timed processing stage
    stage_duration_ms: i64,
}

impl std::fmt::Debug for BookingsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingsManager")
            .field("storage", &"<BookingStorage>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl BookingsManager {
    /// Create a new BookingsManager with the given database path
    pub fn new(db_path: impl AsRef<Path>, tz: Tz, stage_duration_ms: i64) -> ManagerResult<Self> {
        let storage = BookingStorage::open(db_path)?;
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(epoch = %epoch, "BookingsManager started with new epoch");
        Ok(Self {
            storage,
            event_tx,
            epoch,
            tz,
            stage_duration_ms,
        })
    }

    /// Create a BookingsManager with existing storage (for testing)
    #[cfg(test)]
    pub fn with_storage(storage: BookingStorage, stage_duration_ms: i64) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let epoch = uuid::Uuid::new_v4().to_string();
        Self {
            storage,
            event_tx,
            epoch,
            tz: chrono_tz::Asia::Manila,
            stage_duration_ms,
        }
    }

    /// Get the server epoch (unique instance ID)
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &BookingStorage {
        &self.storage
    }

    /// Generate the next booking number (crash-safe via redb)
    fn next_booking_number(&self) -> ManagerResult<String> {
        let count = self.storage.next_booking_count()?;
        Ok(format!("LBA{}{}", number_date_stamp(self.tz), 1000 + count))
    }

    /// Execute a command and return the response
    pub fn execute_command(&self, cmd: BookingCommand) -> CommandResponse {
        match self.process_command(cmd.clone()) {
            Ok((response, events)) => {
                // Broadcast events after successful commit
                for event in events {
                    if self.event_tx.send(event).is_err() {
                        tracing::warn!("Event broadcast failed: no active receivers");
                        break;
                    }
                }
                response
            }
            Err(err) => CommandResponse::error(cmd.command_id, err.into()),
        }
    }

    /// Process command and return response with events
    fn process_command(
        &self,
        cmd: BookingCommand,
    ) -> ManagerResult<(CommandResponse, Vec<BookingEvent>)> {
        tracing::debug!(command_id = %cmd.command_id, payload = ?cmd.payload, "Processing command");

        // 1. Idempotency check (before transaction)
        if self.storage.is_command_processed(&cmd.command_id)? {
            tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 2. Purge bypasses the event pipeline
        if let BookingCommandPayload::PurgeBooking { booking_id } = &cmd.payload {
            return self.purge_booking(cmd.command_id.clone(), booking_id);
        }

        // 3. Pre-generate booking_id and booking_number for SubmitBooking
        // (BEFORE the transaction; redb doesn't allow nested write txns)
        let pre_generated = match &cmd.payload {
            BookingCommandPayload::SubmitBooking { .. } => {
                let booking_id = uuid::Uuid::new_v4().to_string();
                let booking_number = self.next_booking_number()?;
                tracing::debug!(booking_number = %booking_number, "Pre-generated booking number");
                Some((booking_id, booking_number))
            }
            _ => None,
        };

        // 4. Begin write transaction
        let txn = self.storage.begin_write()?;

        // Double-check idempotency within transaction
        if self
            .storage
            .is_command_processed_txn(&txn, &cmd.command_id)?
        {
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        let current_sequence = self.storage.get_current_sequence()?;
        let mut ctx = CommandContext::new(&txn, &self.storage, current_sequence);
        let metadata = CommandMetadata {
            command_id: cmd.command_id.clone(),
            actor_id: cmd.actor_id.clone(),
            actor_name: cmd.actor_name.clone(),
            timestamp: cmd.timestamp,
        };

        // 5. Convert to action and execute
        // SubmitBooking carries the pre-generated identity; AdvanceOrder
        // gets the configured stage duration injected
        let action: CommandAction = match &cmd.payload {
            BookingCommandPayload::SubmitBooking {
                customer,
                selection,
                service_option,
                pickup_date,
                pickup_window,
                payment_method,
            } => {
                let (booking_id, booking_number) = pre_generated.clone().ok_or_else(|| {
                    ManagerError::Internal(
                        "booking identity must be pre-generated for SubmitBooking".to_string(),
                    )
                })?;
                CommandAction::SubmitBooking(SubmitBookingAction {
                    booking_id,
                    booking_number,
                    customer: customer.clone(),
                    selection: selection.clone(),
                    service_option: *service_option,
                    pickup_date: *pickup_date,
                    pickup_window: *pickup_window,
                    payment_method: *payment_method,
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
                stage_duration_ms: self.stage_duration_ms,
            }),
            _ => (&cmd).into(),
        };
        let events = futures::executor::block_on(action.execute(&mut ctx, &metadata))
            .map_err(ManagerError::from)?;

        // 6. Apply events to snapshots, remembering where each record
        // came from and whether it held a pickup slot beforehand
        let mut prior_slot: HashMap<String, (bool, NaiveDate)> = HashMap::new();
        let mut origin: HashMap<String, RecordLocation> = HashMap::new();
        for event in &events {
            let (mut snapshot, location) = match ctx.load_anywhere(&event.booking_id) {
                Ok(pair) => pair,
                Err(_) => (
                    BookingSnapshot::new(event.booking_id.clone()),
                    RecordLocation::Active,
                ),
            };
            prior_slot.entry(event.booking_id.clone()).or_insert((
                snapshot.last_sequence > 0 && snapshot.counts_toward_capacity(),
                snapshot.pickup_date,
            ));
            origin.entry(event.booking_id.clone()).or_insert(location);

            let applier: EventAction = event.into();
            applier.apply(&mut snapshot, event);
            ctx.save_snapshot(snapshot);
        }

        // 7. Persist events
        for event in &events {
            self.storage.store_event(&txn, event)?;
        }

        // 8. Persist snapshots, sync the date index, archive if due
        let now = shared::util::now_millis();
        let modified: Vec<BookingSnapshot> = ctx.modified_snapshots().cloned().collect();
        for mut snapshot in modified {
            let (was_counted, prior_date) = prior_slot
                .get(&snapshot.booking_id)
                .copied()
                .unwrap_or((false, snapshot.pickup_date));
            let counted = snapshot.counts_toward_capacity();
            let prior_key = date_key(prior_date);
            let new_key = date_key(snapshot.pickup_date);

            if was_counted && (!counted || prior_key != new_key) {
                self.storage
                    .remove_date_index(&txn, &prior_key, &snapshot.booking_id)?;
            }
            if counted && (!was_counted || prior_key != new_key) {
                self.storage
                    .insert_date_index(&txn, &new_key, &snapshot.booking_id)?;
            }

            let from_history = origin.get(&snapshot.booking_id)
                == Some(&RecordLocation::History);
            if snapshot.is_archivable() {
                if snapshot.moved_to_history_at.is_none() {
                    snapshot.moved_to_history_at = Some(now);
                }
                if !from_history {
                    self.storage.remove_snapshot(&txn, &snapshot.booking_id)?;
                }
                self.storage.store_history(&txn, &snapshot)?;
            } else {
                if from_history {
                    self.storage.remove_history(&txn, &snapshot.booking_id)?;
                    snapshot.moved_to_history_at = None;
                }
                self.storage.store_snapshot(&txn, &snapshot)?;
            }
        }

        // 9. Update sequence counter
        let max_sequence = events
            .iter()
            .map(|e| e.sequence)
            .max()
            .unwrap_or(current_sequence);
        if max_sequence > current_sequence {
            self.storage.set_sequence(&txn, max_sequence)?;
        }

        // 10. Mark command processed and commit
        self.storage.mark_command_processed(&txn, &cmd.command_id)?;
        txn.commit().map_err(StorageError::from)?;

        let booking_id = match pre_generated {
            Some((booking_id, _)) => Some(booking_id),
            None => events.first().map(|e| e.booking_id.clone()),
        };
        tracing::info!(
            command_id = %cmd.command_id,
            booking_id = ?booking_id,
            event_count = events.len(),
            "Command processed successfully"
        );
        Ok((CommandResponse::success(cmd.command_id, booking_id), events))
    }

    /// Irreversibly remove an archived record and its event stream
    ///
    /// Only history records can be purged; a live record must be
    /// deleted (and thereby archived) first.
    fn purge_booking(
        &self,
        command_id: String,
        booking_id: &str,
    ) -> ManagerResult<(CommandResponse, Vec<BookingEvent>)> {
        let txn = self.storage.begin_write()?;

        if self.storage.is_command_processed_txn(&txn, &command_id)? {
            return Ok((CommandResponse::duplicate(command_id), vec![]));
        }

        if self.storage.get_snapshot_txn(&txn, booking_id)?.is_some() {
            return Err(ManagerError::InvalidState(format!(
                "Booking {} is still live; delete it before purging",
                booking_id
            )));
        }
        let snapshot = self
            .storage
            .get_history_txn(&txn, booking_id)?
            .ok_or_else(|| ManagerError::BookingNotFound(booking_id.to_string()))?;

        self.storage.remove_history(&txn, booking_id)?;
        self.storage.remove_events(&txn, booking_id)?;
        self.storage
            .remove_date_index(&txn, &date_key(snapshot.pickup_date), booking_id)?;
        self.storage.mark_command_processed(&txn, &command_id)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(booking_id = %booking_id, "Booking purged");
        Ok((
            CommandResponse::success(command_id, Some(booking_id.to_string())),
            vec![],
        ))
    }

    // ========== Public Query Methods ==========

    /// Get a live snapshot by booking ID
    pub fn get_snapshot(&self, booking_id: &str) -> ManagerResult<Option<BookingSnapshot>> {
        Ok(self.storage.get_snapshot(booking_id)?)
    }

    /// Get an archived snapshot by booking ID
    pub fn get_history_booking(
        &self,
        booking_id: &str,
    ) -> ManagerResult<Option<BookingSnapshot>> {
        Ok(self.storage.get_history(booking_id)?)
    }

    /// All live bookings and orders
    pub fn get_active_bookings(&self) -> ManagerResult<Vec<BookingSnapshot>> {
        Ok(self.storage.get_active_snapshots()?)
    }

    /// Archived records, newest first
    pub fn get_history_bookings(&self) -> ManagerResult<Vec<BookingSnapshot>> {
        Ok(self.storage.get_history_snapshots()?)
    }

    /// Per-date slot usage for the booking calendar
    pub fn booking_counts(&self, dates: &[String]) -> ManagerResult<Vec<DateBookingCount>> {
        Ok(self.storage.booking_counts(dates, DAILY_PICKUP_CAPACITY)?)
    }

    /// All events for one booking, in sequence order
    pub fn get_events_for_booking(&self, booking_id: &str) -> ManagerResult<Vec<BookingEvent>> {
        Ok(self.storage.get_events(booking_id)?)
    }

    /// Get current sequence number
    pub fn get_current_sequence(&self) -> ManagerResult<u64> {
        Ok(self.storage.get_current_sequence()?)
    }

    /// Rebuild a snapshot from its event stream (for verification)
    pub fn rebuild_snapshot(&self, booking_id: &str) -> ManagerResult<BookingSnapshot> {
        let events = self.storage.get_events(booking_id)?;
        if events.is_empty() {
            return Err(ManagerError::BookingNotFound(booking_id.to_string()));
        }
        Ok(reducer::reduce(booking_id, &events))
    }

    /// Orders whose stage timer has expired with auto-advance enabled
    ///
    /// Returns (booking_id, observed status) pairs; the observed status
    /// becomes the expected_status guard of the AdvanceOrder command so
    /// a racing admin advance turns the scheduler's into a no-op.
    pub fn due_auto_advances(
        &self,
        now: i64,
    ) -> ManagerResult<Vec<(String, BookingStatus)>> {
        let snapshots = self.storage.get_active_snapshots()?;
        Ok(snapshots
            .into_iter()
            .filter(|s| is_due_for_auto_advance(s, now))
            .map(|s| (s.booking_id, s.status))
            .collect())
    }
}

// Make BookingsManager Clone-able
impl Clone for BookingsManager {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            event_tx: self.event_tx.clone(),
            epoch: self.epoch.clone(),
            tz: self.tz,
            stage_duration_ms: self.stage_duration_ms,
        }
    }
}

#[cfg(test)]
mod tests;
