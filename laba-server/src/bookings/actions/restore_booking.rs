//! RestoreBooking command handler
//!
//! Two restore paths:
//! - a soft-deleted record (usually sitting in the archive) comes back
//!   to its prior status with the deletion flags cleared
//! - a rejected booking returns to PendingBooking with the rejection
//!   reason cleared, for re-review
//!
//! A restored record occupies its pickup slot again, so the capacity
//! gate re-runs for its date.

use async_trait::async_trait;

use crate::bookings::capacity::check_capacity;
use crate::bookings::traits::{BookingError, CommandContext, CommandHandler, CommandMetadata};
use crate::utils::time::date_key;
use shared::booking::{BookingEvent, BookingEventType, BookingStatus, EventPayload};

/// RestoreBooking action
#[derive(Debug, Clone)]
pub struct RestoreBookingAction {
    pub booking_id: String,
}

#[async_trait]
impl CommandHandler for RestoreBookingAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        let (snapshot, _location) = ctx.load_anywhere(&self.booking_id)?;

        if !snapshot.is_deleted && snapshot.status != BookingStatus::Rejected {
            return Err(BookingError::InvalidState(format!(
                "Booking {} is not deleted or rejected, nothing to restore",
                self.booking_id
            )));
        }

        // The record will count toward its date again; make sure the
        // slot still exists. Rejected records restore to
        // PendingBooking, which always counts.
        let counts_after_restore = if snapshot.is_deleted {
            !matches!(
                snapshot.status,
                BookingStatus::Rejected | BookingStatus::Cancelled
            )
        } else {
            true
        };
        if counts_after_restore {
            check_capacity(ctx, &date_key(snapshot.pickup_date))?;
        }

        let seq = ctx.next_sequence();
        Ok(vec![BookingEvent::new(
            seq,
            self.booking_id.clone(),
            metadata.actor_id.clone(),
            metadata.actor_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            BookingEventType::BookingRestored,
            EventPayload::BookingRestored {},
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::capacity::DAILY_PICKUP_CAPACITY;
    use crate::bookings::storage::BookingStorage;
    use chrono::NaiveDate;
    use shared::booking::BookingSnapshot;

    fn test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor_id: "admin-1".to_string(),
            actor_name: "Admin".to_string(),
            timestamp: 1234567890,
        }
    }

    fn action() -> RestoreBookingAction {
        RestoreBookingAction {
            booking_id: "b-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_restore_deleted_record_from_history() {
        let storage = BookingStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut snap = BookingSnapshot::new("b-1".to_string());
        snap.status = BookingStatus::Washing;
        snap.is_deleted = true;
        snap.deleted_at = Some(1_000);
        storage.store_history(&txn, &snap).unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let events = action().execute(&mut ctx, &test_metadata()).await.unwrap();
        assert_eq!(events[0].event_type, BookingEventType::BookingRestored);
    }

    #[tokio::test]
    async fn test_restore_rejected_live_record() {
        let storage = BookingStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut snap = BookingSnapshot::new("b-1".to_string());
        snap.status = BookingStatus::Rejected;
        snap.rejection_reason = Some("over capacity".to_string());
        storage.store_snapshot(&txn, &snap).unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let events = action().execute(&mut ctx, &test_metadata()).await.unwrap();
        assert_eq!(events[0].event_type, BookingEventType::BookingRestored);
    }

    #[tokio::test]
    async fn test_restore_ordinary_record_fails() {
        let storage = BookingStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut snap = BookingSnapshot::new("b-1".to_string());
        snap.status = BookingStatus::Washing;
        storage.store_snapshot(&txn, &snap).unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = action().execute(&mut ctx, &test_metadata()).await;
        assert!(matches!(result, Err(BookingError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_restore_blocked_when_date_refilled() {
        let storage = BookingStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut snap = BookingSnapshot::new("b-1".to_string());
        snap.status = BookingStatus::Pending;
        snap.is_deleted = true;
        snap.pickup_date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        storage.store_history(&txn, &snap).unwrap();
        // Date filled up again after the delete
        for i in 0..DAILY_PICKUP_CAPACITY {
            storage
                .insert_date_index(&txn, "2026-05-01", &format!("other-{}", i))
                .unwrap();
        }
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = action().execute(&mut ctx, &test_metadata()).await;
        assert!(matches!(result, Err(BookingError::CapacityExceeded { .. })));
    }
}
