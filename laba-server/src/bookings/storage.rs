//! redb-based storage layer for booking event sourcing
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `events` | `(booking_id, sequence)` | `BookingEvent` | Event stream (append-only) |
//! | `snapshots` | `booking_id` | `BookingSnapshot` | Live records |
//! | `history` | `booking_id` | `BookingSnapshot` | Archived records |
//! | `date_index` | `(pickup_date, booking_id)` | `()` | Capacity counting |
//! | `processed_commands` | `command_id` | `()` | Idempotency check |
//! | `sequence_counter` | `()` | `u64` | Global sequence / booking counter |
//!
//! # Durability
//!
//! redb commits are durable as soon as `commit()` returns (copy-on-write
//! with atomic pointer swap), which keeps the store consistent across
//! power loss on the shop machine.

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use shared::booking::{BookingEvent, BookingSnapshot, DateBookingCount};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Event stream: key = (booking_id, sequence), value = JSON BookingEvent
const EVENTS_TABLE: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("events");

/// Live records: key = booking_id, value = JSON BookingSnapshot
const SNAPSHOTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

/// Archived records: key = booking_id, value = JSON BookingSnapshot
const HISTORY_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("history");

/// Capacity index: key = (pickup_date YYYY-MM-DD, booking_id)
const DATE_INDEX_TABLE: TableDefinition<(&str, &str), ()> = TableDefinition::new("date_index");

/// Idempotency: key = command_id
const PROCESSED_COMMANDS_TABLE: TableDefinition<&str, ()> =
    TableDefinition::new("processed_commands");

/// Counters: key = "seq" or "booking_count"
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const SEQUENCE_KEY: &str = "seq";
const BOOKING_COUNT_KEY: &str = "booking_count";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Booking storage backed by redb
#[derive(Clone)]
pub struct BookingStorage {
    db: Arc<Database>,
}

impl BookingStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(EVENTS_TABLE)?;
            let _ = write_txn.open_table(SNAPSHOTS_TABLE)?;
            let _ = write_txn.open_table(HISTORY_TABLE)?;
            let _ = write_txn.open_table(DATE_INDEX_TABLE)?;
            let _ = write_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(SEQUENCE_KEY)?.is_none() {
                seq_table.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sequence Operations ==========

    /// Current global sequence number
    pub fn get_current_sequence(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Persist the sequence after events were allocated in a transaction
    pub fn set_sequence(&self, txn: &WriteTransaction, sequence: u64) -> StorageResult<()> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        table.insert(SEQUENCE_KEY, sequence)?;
        Ok(())
    }

    /// Increment and return the booking counter (crash-safe, own txn)
    ///
    /// Called before the main command transaction; redb does not allow
    /// nested write transactions.
    pub fn next_booking_count(&self) -> StorageResult<u64> {
        let txn = self.db.begin_write()?;
        let count = {
            let mut table = txn.open_table(SEQUENCE_TABLE)?;
            let current = table
                .get(BOOKING_COUNT_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0);
            let next = current + 1;
            table.insert(BOOKING_COUNT_KEY, next)?;
            next
        };
        txn.commit()?;
        Ok(count)
    }

    // ========== Idempotency ==========

    pub fn is_command_processed(&self, command_id: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    pub fn is_command_processed_txn(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    pub fn mark_command_processed(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        table.insert(command_id, ())?;
        Ok(())
    }

    // ========== Events ==========

    pub fn store_event(&self, txn: &WriteTransaction, event: &BookingEvent) -> StorageResult<()> {
        let mut table = txn.open_table(EVENTS_TABLE)?;
        let bytes = serde_json::to_vec(event)?;
        table.insert((event.booking_id.as_str(), event.sequence), bytes.as_slice())?;
        Ok(())
    }

    /// All events for a booking, in sequence order
    pub fn get_events(&self, booking_id: &str) -> StorageResult<Vec<BookingEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;
        let mut events = Vec::new();
        for entry in table.range((booking_id, 0u64)..=(booking_id, u64::MAX))? {
            let (_, value) = entry?;
            events.push(serde_json::from_slice(value.value())?);
        }
        Ok(events)
    }

    /// Remove a booking's entire event stream (purge only)
    pub fn remove_events(&self, txn: &WriteTransaction, booking_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(EVENTS_TABLE)?;
        let sequences: Vec<u64> = table
            .range((booking_id, 0u64)..=(booking_id, u64::MAX))?
            .filter_map(|entry| entry.ok().map(|(key, _)| key.value().1))
            .collect();
        for seq in sequences {
            table.remove((booking_id, seq))?;
        }
        Ok(())
    }

    // ========== Snapshots (live records) ==========

    pub fn store_snapshot(
        &self,
        txn: &WriteTransaction,
        snapshot: &BookingSnapshot,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(SNAPSHOTS_TABLE)?;
        let bytes = serde_json::to_vec(snapshot)?;
        table.insert(snapshot.booking_id.as_str(), bytes.as_slice())?;
        Ok(())
    }

    pub fn remove_snapshot(&self, txn: &WriteTransaction, booking_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(SNAPSHOTS_TABLE)?;
        table.remove(booking_id)?;
        Ok(())
    }

    pub fn get_snapshot(&self, booking_id: &str) -> StorageResult<Option<BookingSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SNAPSHOTS_TABLE)?;
        match table.get(booking_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_snapshot_txn(
        &self,
        txn: &WriteTransaction,
        booking_id: &str,
    ) -> StorageResult<Option<BookingSnapshot>> {
        let table = txn.open_table(SNAPSHOTS_TABLE)?;
        match table.get(booking_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All live records (active bookings and orders)
    pub fn get_active_snapshots(&self) -> StorageResult<Vec<BookingSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SNAPSHOTS_TABLE)?;
        let mut snapshots = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            snapshots.push(serde_json::from_slice(value.value())?);
        }
        Ok(snapshots)
    }

    // ========== History (archived records) ==========

    pub fn store_history(
        &self,
        txn: &WriteTransaction,
        snapshot: &BookingSnapshot,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(HISTORY_TABLE)?;
        let bytes = serde_json::to_vec(snapshot)?;
        table.insert(snapshot.booking_id.as_str(), bytes.as_slice())?;
        Ok(())
    }

    pub fn remove_history(&self, txn: &WriteTransaction, booking_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(HISTORY_TABLE)?;
        table.remove(booking_id)?;
        Ok(())
    }

    pub fn get_history(&self, booking_id: &str) -> StorageResult<Option<BookingSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(HISTORY_TABLE)?;
        match table.get(booking_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_history_txn(
        &self,
        txn: &WriteTransaction,
        booking_id: &str,
    ) -> StorageResult<Option<BookingSnapshot>> {
        let table = txn.open_table(HISTORY_TABLE)?;
        match table.get(booking_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All archived records, newest first
    pub fn get_history_snapshots(&self) -> StorageResult<Vec<BookingSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(HISTORY_TABLE)?;
        let mut snapshots: Vec<BookingSnapshot> = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            snapshots.push(serde_json::from_slice(value.value())?);
        }
        snapshots.sort_by_key(|s| std::cmp::Reverse(s.moved_to_history_at.unwrap_or(0)));
        Ok(snapshots)
    }

    // ========== Date Index (capacity) ==========

    pub fn insert_date_index(
        &self,
        txn: &WriteTransaction,
        date_key: &str,
        booking_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(DATE_INDEX_TABLE)?;
        table.insert((date_key, booking_id), ())?;
        Ok(())
    }

    pub fn remove_date_index(
        &self,
        txn: &WriteTransaction,
        date_key: &str,
        booking_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(DATE_INDEX_TABLE)?;
        table.remove((date_key, booking_id))?;
        Ok(())
    }

    /// Active booking count for a date, inside a write transaction
    ///
    /// This is the count the capacity gate trusts: it sees all index
    /// mutations already made in this transaction.
    pub fn date_count_txn(&self, txn: &WriteTransaction, date_key: &str) -> StorageResult<u32> {
        let table = txn.open_table(DATE_INDEX_TABLE)?;
        let mut count = 0u32;
        for entry in table.range((date_key, "")..=(date_key, "\u{10FFFF}"))? {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    /// Read-only date count (for the client calendar)
    pub fn date_count(&self, date_key: &str) -> StorageResult<u32> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(DATE_INDEX_TABLE)?;
        let mut count = 0u32;
        for entry in table.range((date_key, "")..=(date_key, "\u{10FFFF}"))? {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    /// Counts for a set of dates with availability against `capacity`
    pub fn booking_counts(
        &self,
        date_keys: &[String],
        capacity: u32,
    ) -> StorageResult<Vec<DateBookingCount>> {
        let mut counts = Vec::with_capacity(date_keys.len());
        for date in date_keys {
            let count = self.date_count(date)?;
            counts.push(DateBookingCount {
                date: date.clone(),
                count,
                available: count < capacity,
            });
        }
        Ok(counts)
    }
}
