//! AdvanceOrder command handler
//!
//! Moves an order one step along the fixed processing progression:
//! Pending -> Washing -> Drying -> Folding -> Ready -> Completed.
//! Carries an optimistic-concurrency guard so two admins (or an admin
//! racing the expiry scheduler) cannot double-advance an order.

use async_trait::async_trait;

use crate::bookings::traits::{BookingError, CommandContext, CommandHandler, CommandMetadata};
use shared::booking::{BookingEvent, BookingEventType, BookingStatus, EventPayload};

/// AdvanceOrder action
///
/// `stage_duration_ms` is injected by the manager from config so the
/// emitted event carries the duration replay will use.
#[derive(Debug, Clone)]
pub struct AdvanceOrderAction {
    pub booking_id: String,
    /// Status the caller observed; None skips the guard
    pub expected_status: Option<BookingStatus>,
    /// True when triggered by timer expiry
    pub auto: bool,
    pub stage_duration_ms: i64,
}

#[async_trait]
impl CommandHandler for AdvanceOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        let snapshot = ctx.load_snapshot(&self.booking_id)?;

        if snapshot.is_deleted {
            return Err(BookingError::InvalidState(format!(
                "Booking {} is deleted",
                self.booking_id
            )));
        }

        // Optimistic-concurrency guard. If the order already sits one
        // stage past what the caller saw, someone performed the same
        // advance first: treat this as a duplicate and do nothing.
        // Larger drift means the caller's view is stale beyond a single
        // race and must be refreshed.
        if let Some(expected) = self.expected_status
            && expected != snapshot.status
        {
            if expected.next_stage() == Some(snapshot.status) {
                return Ok(vec![]);
            }
            return Err(BookingError::ConcurrentModification(format!(
                "Booking {} is {} but caller expected {}",
                self.booking_id, snapshot.status, expected
            )));
        }

        let from = snapshot.status;
        let to = from.next_stage().ok_or_else(|| {
            BookingError::InvalidTransition(format!(
                "Cannot advance booking {} from status {}",
                self.booking_id, from
            ))
        })?;

        let seq = ctx.next_sequence();
        let mut events = vec![BookingEvent::new(
            seq,
            self.booking_id.clone(),
            metadata.actor_id.clone(),
            metadata.actor_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            BookingEventType::StageAdvanced,
            EventPayload::StageAdvanced {
                from,
                to,
                auto: self.auto,
                stage_duration_ms: to.is_timed().then_some(self.stage_duration_ms),
            },
        )];

        // Advancing out of Ready is completion
        if to == BookingStatus::Completed {
            let seq = ctx.next_sequence();
            events.push(BookingEvent::new(
                seq,
                self.booking_id.clone(),
                metadata.actor_id.clone(),
                metadata.actor_name.clone(),
                metadata.command_id.clone(),
                Some(metadata.timestamp),
                BookingEventType::OrderCompleted,
                EventPayload::OrderCompleted {
                    total_price: snapshot.pricing.total_price,
                },
            ));
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::storage::BookingStorage;
    use shared::booking::BookingSnapshot;

    const HOUR_MS: i64 = 3_600_000;

    fn test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor_id: "admin-1".to_string(),
            actor_name: "Admin".to_string(),
            timestamp: 1234567890,
        }
    }

    fn setup(status: BookingStatus) -> BookingStorage {
        let storage = BookingStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut snap = BookingSnapshot::new("b-1".to_string());
        snap.status = status;
        storage.store_snapshot(&txn, &snap).unwrap();
        txn.commit().unwrap();
        storage
    }

    fn action(expected: Option<BookingStatus>) -> AdvanceOrderAction {
        AdvanceOrderAction {
            booking_id: "b-1".to_string(),
            expected_status: expected,
            auto: false,
            stage_duration_ms: HOUR_MS,
        }
    }

    #[tokio::test]
    async fn test_advance_into_timed_stage_carries_duration() {
        let storage = setup(BookingStatus::Pending);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let events = action(Some(BookingStatus::Pending))
            .execute(&mut ctx, &test_metadata())
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        if let EventPayload::StageAdvanced {
            from,
            to,
            auto,
            stage_duration_ms,
        } = &events[0].payload
        {
            assert_eq!(*from, BookingStatus::Pending);
            assert_eq!(*to, BookingStatus::Washing);
            assert!(!auto);
            assert_eq!(*stage_duration_ms, Some(HOUR_MS));
        } else {
            panic!("Expected StageAdvanced payload");
        }
    }

    #[tokio::test]
    async fn test_advance_into_untimed_stage_has_no_duration() {
        let storage = setup(BookingStatus::Folding);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let events = action(None).execute(&mut ctx, &test_metadata()).await.unwrap();
        if let EventPayload::StageAdvanced {
            to,
            stage_duration_ms,
            ..
        } = &events[0].payload
        {
            assert_eq!(*to, BookingStatus::Ready);
            assert!(stage_duration_ms.is_none());
        } else {
            panic!("Expected StageAdvanced payload");
        }
    }

    #[tokio::test]
    async fn test_advance_from_ready_also_completes() {
        let storage = setup(BookingStatus::Ready);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let events = action(None).execute(&mut ctx, &test_metadata()).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, BookingEventType::StageAdvanced);
        assert_eq!(events[1].event_type, BookingEventType::OrderCompleted);
    }

    #[tokio::test]
    async fn test_one_stage_drift_is_duplicate_noop() {
        // Caller saw Washing, but a racing advance already moved it to Drying
        let storage = setup(BookingStatus::Drying);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let events = action(Some(BookingStatus::Washing))
            .execute(&mut ctx, &test_metadata())
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_larger_drift_is_concurrent_modification() {
        let storage = setup(BookingStatus::Folding);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = action(Some(BookingStatus::Washing))
            .execute(&mut ctx, &test_metadata())
            .await;
        assert!(matches!(
            result,
            Err(BookingError::ConcurrentModification(_))
        ));
    }

    #[tokio::test]
    async fn test_advance_completed_order_fails() {
        let storage = setup(BookingStatus::Completed);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = action(None).execute(&mut ctx, &test_metadata()).await;
        assert!(matches!(result, Err(BookingError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_advance_booking_region_fails() {
        let storage = setup(BookingStatus::Approved);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = action(None).execute(&mut ctx, &test_metadata()).await;
        assert!(matches!(result, Err(BookingError::InvalidTransition(_))));
    }
}
