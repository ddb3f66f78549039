use super::*;
use shared::booking::{
    Address, AddOnService, Barangay, CommandErrorCode, CustomerInfo, MainService, PaymentDecision,
    PaymentMethod, PaymentStatus, PickupWindow, ServiceOption, ServiceSelection,
};

const HOUR_MS: i64 = 3_600_000;

fn create_test_manager() -> BookingsManager {
    let storage = BookingStorage::open_in_memory().unwrap();
    BookingsManager::with_storage(storage, HOUR_MS)
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, day).unwrap()
}

fn test_customer(barangay: Barangay) -> CustomerInfo {
    CustomerInfo {
        name: "Maria Santos".to_string(),
        contact_number: "09171234567".to_string(),
        email: None,
        address: Address {
            street: "123 Rizal St".to_string(),
            block_lot: None,
            barangay,
        },
    }
}

fn selection(load_count: u32, add_ons: Vec<AddOnService>) -> ServiceSelection {
    ServiceSelection {
        main_service: MainService::WashDryFold,
        add_ons,
        load_count,
    }
}

fn admin_cmd(payload: BookingCommandPayload) -> BookingCommand {
    BookingCommand::new("admin-1", "Test Admin", payload)
}

fn submit_cmd(pickup_date: NaiveDate, payment_method: PaymentMethod) -> BookingCommand {
    BookingCommand::new(
        "cust-1",
        "Maria Santos",
        BookingCommandPayload::SubmitBooking {
            customer: test_customer(Barangay::Parian),
            selection: selection(2, vec![]),
            service_option: ServiceOption::PickupOnly,
            pickup_date,
            pickup_window: PickupWindow::Morning,
            payment_method,
        },
    )
}

// ========================================================================
// Helper: drive a booking through the lifecycle
// ========================================================================

fn submit_booking(manager: &BookingsManager, pickup_date: NaiveDate) -> String {
    let resp = manager.execute_command(submit_cmd(pickup_date, PaymentMethod::Cash));
    assert!(resp.success, "Failed to submit booking: {:?}", resp.error);
    resp.booking_id.unwrap()
}

fn approve_booking(manager: &BookingsManager, booking_id: &str) -> CommandResponse {
    manager.execute_command(admin_cmd(BookingCommandPayload::ApproveBooking {
        booking_id: booking_id.to_string(),
    }))
}

fn create_order(manager: &BookingsManager, booking_id: &str) -> CommandResponse {
    manager.execute_command(admin_cmd(BookingCommandPayload::CreateOrder {
        booking_id: booking_id.to_string(),
    }))
}

fn advance_order(
    manager: &BookingsManager,
    booking_id: &str,
    expected: Option<BookingStatus>,
) -> CommandResponse {
    manager.execute_command(admin_cmd(BookingCommandPayload::AdvanceOrder {
        booking_id: booking_id.to_string(),
        expected_status: expected,
        auto: false,
    }))
}

/// Submit + approve + create: booking sits at Pending, ready to process
fn open_order(manager: &BookingsManager, pickup_date: NaiveDate) -> String {
    let booking_id = submit_booking(manager, pickup_date);
    let resp = approve_booking(manager, &booking_id);
    assert!(resp.success, "Failed to approve: {:?}", resp.error);
    let resp = create_order(manager, &booking_id);
    assert!(resp.success, "Failed to create order: {:?}", resp.error);
    booking_id
}

/// Advance an order at Pending all the way to Completed
fn run_to_completion(manager: &BookingsManager, booking_id: &str) {
    // Pending -> Washing -> Drying -> Folding -> Ready -> Completed
    for _ in 0..5 {
        let resp = advance_order(manager, booking_id, None);
        assert!(resp.success, "Failed to advance: {:?}", resp.error);
    }
}

fn mark_paid(manager: &BookingsManager, booking_id: &str) -> CommandResponse {
    manager.execute_command(admin_cmd(BookingCommandPayload::MarkPaid {
        booking_id: booking_id.to_string(),
    }))
}

fn delete_booking(manager: &BookingsManager, booking_id: &str) -> CommandResponse {
    manager.execute_command(admin_cmd(BookingCommandPayload::DeleteBooking {
        booking_id: booking_id.to_string(),
    }))
}

fn restore_booking(manager: &BookingsManager, booking_id: &str) -> CommandResponse {
    manager.execute_command(admin_cmd(BookingCommandPayload::RestoreBooking {
        booking_id: booking_id.to_string(),
    }))
}

fn assert_status(manager: &BookingsManager, booking_id: &str, expected: BookingStatus) {
    let snapshot = manager.get_snapshot(booking_id).unwrap().unwrap();
    assert_eq!(
        snapshot.status, expected,
        "Expected booking status {:?}, got {:?}",
        expected, snapshot.status
    );
}

fn error_code(resp: &CommandResponse) -> CommandErrorCode {
    resp.error.as_ref().expect("expected an error").code.clone()
}

mod test_payments;
