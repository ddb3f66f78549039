//! Core traits and context for booking command processing

use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use redb::WriteTransaction;
use shared::booking::{BookingEvent, BookingSnapshot};
use std::collections::HashMap;
use thiserror::Error;

use super::storage::{BookingStorage, StorageError};

/// Booking domain errors surfaced by command handlers
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Pickup date {date} is full ({count} bookings)")]
    CapacityExceeded { date: String, count: u32 },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for BookingError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::BookingNotFound(id) => BookingError::BookingNotFound(id),
            other => BookingError::Storage(other.to_string()),
        }
    }
}

/// Where a record currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLocation {
    /// In the live snapshots table
    Active,
    /// In the history archive (completed+paid or soft-deleted)
    History,
}

/// Command metadata extracted from the envelope
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub actor_id: String,
    pub actor_name: String,
    pub timestamp: i64,
}

/// Per-command execution context
///
/// Wraps the write transaction so every read a handler performs sees the
/// same state the commit will apply against; redb's single writer makes
/// the whole command atomic.
pub struct CommandContext<'a> {
    txn: &'a WriteTransaction,
    storage: &'a BookingStorage,
    current_sequence: u64,
    /// Snapshots mutated during this command, keyed by booking_id.
    /// Persisted by the manager after all events are applied.
    modified: HashMap<String, BookingSnapshot>,
}

impl<'a> CommandContext<'a> {
    pub fn new(txn: &'a WriteTransaction, storage: &'a BookingStorage, current_sequence: u64) -> Self {
        Self {
            txn,
            storage,
            current_sequence,
            modified: HashMap::new(),
        }
    }

    /// Allocate the next global sequence number
    pub fn next_sequence(&mut self) -> u64 {
        self.current_sequence += 1;
        self.current_sequence
    }

    /// Sequence of the last allocated event
    pub fn last_sequence(&self) -> u64 {
        self.current_sequence
    }

    /// Load a live (non-archived) booking snapshot
    ///
    /// Checks the modified cache first so appliers within the same
    /// command see each other's changes.
    pub fn load_snapshot(&self, booking_id: &str) -> Result<BookingSnapshot, BookingError> {
        if let Some(snap) = self.modified.get(booking_id) {
            return Ok(snap.clone());
        }
        self.storage
            .get_snapshot_txn(self.txn, booking_id)?
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))
    }

    /// Load a booking from either the live table or the history archive
    pub fn load_anywhere(
        &self,
        booking_id: &str,
    ) -> Result<(BookingSnapshot, RecordLocation), BookingError> {
        if let Some(snap) = self.modified.get(booking_id) {
            return Ok((snap.clone(), RecordLocation::Active));
        }
        if let Some(snap) = self.storage.get_snapshot_txn(self.txn, booking_id)? {
            return Ok((snap, RecordLocation::Active));
        }
        if let Some(snap) = self.storage.get_history_txn(self.txn, booking_id)? {
            return Ok((snap, RecordLocation::History));
        }
        Err(BookingError::BookingNotFound(booking_id.to_string()))
    }

    /// Stage an updated snapshot for persistence at commit time
    pub fn save_snapshot(&mut self, snapshot: BookingSnapshot) {
        self.modified.insert(snapshot.booking_id.clone(), snapshot);
    }

    /// Snapshots mutated during this command
    pub fn modified_snapshots(&self) -> impl Iterator<Item = &BookingSnapshot> {
        self.modified.values()
    }

    /// Active booking count for a pickup date (inside this transaction)
    pub fn pickup_count(&self, date_key: &str) -> Result<u32, BookingError> {
        Ok(self.storage.date_count_txn(self.txn, date_key)?)
    }
}

/// Command handler - validates a command against current state and
/// produces the events to record. Handlers never mutate snapshots.
#[async_trait]
pub trait CommandHandler {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError>;
}

/// Event applier - pure function from (snapshot, event) to snapshot
#[enum_dispatch]
pub trait EventApplier {
    fn apply(&self, snapshot: &mut BookingSnapshot, event: &BookingEvent);
}
