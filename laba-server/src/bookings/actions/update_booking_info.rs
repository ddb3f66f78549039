//! UpdateBookingInfo command handler
//!
//! Edits the service selection, service option, or pickup slot of a
//! booking before processing starts. Every accepted edit recomputes the
//! pricing snapshot; a pickup date change re-runs the capacity gate on
//! the new date.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::bookings::capacity::check_capacity;
use crate::bookings::traits::{BookingError, CommandContext, CommandHandler, CommandMetadata};
use crate::pricing::{compute_pricing, resolve_delivery_fee};
use crate::utils::time::date_key;
use shared::booking::{
    BookingEvent, BookingEventType, BookingStatus, EventPayload, PickupWindow, ServiceOption,
    ServiceSelection,
};

/// UpdateBookingInfo action - all fields optional, at least one required
#[derive(Debug, Clone)]
pub struct UpdateBookingInfoAction {
    pub booking_id: String,
    pub selection: Option<ServiceSelection>,
    pub service_option: Option<ServiceOption>,
    pub pickup_date: Option<NaiveDate>,
    pub pickup_window: Option<PickupWindow>,
}

#[async_trait]
impl CommandHandler for UpdateBookingInfoAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<BookingEvent>, BookingError> {
        if self.selection.is_none()
            && self.service_option.is_none()
            && self.pickup_date.is_none()
            && self.pickup_window.is_none()
        {
            return Err(BookingError::InvalidSelection(
                "Update carries no changes".to_string(),
            ));
        }

        let snapshot = ctx.load_snapshot(&self.booking_id)?;

        if snapshot.is_deleted {
            return Err(BookingError::InvalidState(format!(
                "Booking {} is deleted",
                self.booking_id
            )));
        }

        // Editable only before the laundry hits the machines
        if !matches!(
            snapshot.status,
            BookingStatus::PendingBooking | BookingStatus::Approved | BookingStatus::Pending
        ) {
            return Err(BookingError::InvalidTransition(format!(
                "Cannot edit booking {} in status {}",
                self.booking_id, snapshot.status
            )));
        }

        let selection = self.selection.as_ref().unwrap_or(&snapshot.selection);
        if selection.load_count < 1 {
            return Err(BookingError::InvalidSelection(
                "load_count must be at least 1".to_string(),
            ));
        }
        let service_option = self.service_option.unwrap_or(snapshot.service_option);

        // Moving to a new date takes a slot there; the old slot is
        // released by the manager's index sync after commit
        if let Some(new_date) = self.pickup_date
            && new_date != snapshot.pickup_date
        {
            check_capacity(ctx, &date_key(new_date))?;
        }

        let delivery_fee =
            resolve_delivery_fee(snapshot.customer.address.barangay, selection.load_count);
        let pricing = compute_pricing(
            selection,
            service_option,
            delivery_fee,
            &snapshot.pricing.add_on_prices,
        )
        .map_err(|e| BookingError::InvalidSelection(e.to_string()))?;

        let seq = ctx.next_sequence();
        Ok(vec![BookingEvent::new(
            seq,
            self.booking_id.clone(),
            metadata.actor_id.clone(),
            metadata.actor_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            BookingEventType::BookingInfoUpdated,
            EventPayload::BookingInfoUpdated {
                selection: self.selection.clone(),
                service_option: self.service_option,
                pickup_date: self.pickup_date,
                pickup_window: self.pickup_window,
                pricing,
            },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::capacity::DAILY_PICKUP_CAPACITY;
    use crate::bookings::storage::BookingStorage;
    use shared::booking::{Address, Barangay, BookingSnapshot, CustomerInfo, MainService};

    fn test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor_id: "admin-1".to_string(),
            actor_name: "Admin".to_string(),
            timestamp: 1234567890,
        }
    }

    fn test_snapshot(status: BookingStatus) -> BookingSnapshot {
        let mut snap = BookingSnapshot::new("b-1".to_string());
        snap.status = status;
        snap.customer = CustomerInfo {
            name: "Maria Santos".to_string(),
            contact_number: "09171234567".to_string(),
            email: None,
            address: Address {
                street: "123 Rizal St".to_string(),
                block_lot: None,
                barangay: Barangay::Looc,
            },
        };
        snap.selection = ServiceSelection {
            main_service: MainService::WashDry,
            add_ons: vec![],
            load_count: 1,
        };
        snap.pickup_date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        snap
    }

    #[tokio::test]
    async fn test_update_selection_reprices() {
        let storage = BookingStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage
            .store_snapshot(&txn, &test_snapshot(BookingStatus::Approved))
            .unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = UpdateBookingInfoAction {
            booking_id: "b-1".to_string(),
            selection: Some(ServiceSelection {
                main_service: MainService::WashDryFold,
                add_ons: vec![],
                load_count: 3,
            }),
            service_option: None,
            pickup_date: None,
            pickup_window: None,
        };
        let events = action.execute(&mut ctx, &test_metadata()).await.unwrap();
        if let EventPayload::BookingInfoUpdated { pricing, .. } = &events[0].payload {
            assert_eq!(pricing.main_service_price, 199.0 * 3.0);
        } else {
            panic!("Expected BookingInfoUpdated payload");
        }
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected() {
        let storage = BookingStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage
            .store_snapshot(&txn, &test_snapshot(BookingStatus::Approved))
            .unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = UpdateBookingInfoAction {
            booking_id: "b-1".to_string(),
            selection: None,
            service_option: None,
            pickup_date: None,
            pickup_window: None,
        };
        let result = action.execute(&mut ctx, &test_metadata()).await;
        assert!(matches!(result, Err(BookingError::InvalidSelection(_))));
    }

    #[tokio::test]
    async fn test_update_mid_processing_fails() {
        let storage = BookingStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage
            .store_snapshot(&txn, &test_snapshot(BookingStatus::Washing))
            .unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = UpdateBookingInfoAction {
            booking_id: "b-1".to_string(),
            pickup_window: Some(PickupWindow::Afternoon),
            selection: None,
            service_option: None,
            pickup_date: None,
        };
        let result = action.execute(&mut ctx, &test_metadata()).await;
        assert!(matches!(result, Err(BookingError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_date_change_to_full_date_fails() {
        let storage = BookingStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage
            .store_snapshot(&txn, &test_snapshot(BookingStatus::Approved))
            .unwrap();
        for i in 0..DAILY_PICKUP_CAPACITY {
            storage
                .insert_date_index(&txn, "2026-05-02", &format!("other-{}", i))
                .unwrap();
        }
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = UpdateBookingInfoAction {
            booking_id: "b-1".to_string(),
            pickup_date: NaiveDate::from_ymd_opt(2026, 5, 2),
            selection: None,
            service_option: None,
            pickup_window: None,
        };
        let result = action.execute(&mut ctx, &test_metadata()).await;
        assert!(matches!(result, Err(BookingError::CapacityExceeded { .. })));
    }
}
