use super::*;

fn submit_gcash_booking(manager: &BookingsManager) -> String {
    let resp = manager.execute_command(submit_cmd(date(1), PaymentMethod::Gcash));
    assert!(resp.success, "{:?}", resp.error);
    resp.booking_id.unwrap()
}

fn submit_proof(manager: &BookingsManager, booking_id: &str) -> CommandResponse {
    manager.execute_command(BookingCommand::new(
        "cust-1",
        "Maria Santos",
        BookingCommandPayload::SubmitPaymentProof {
            booking_id: booking_id.to_string(),
            reference: "GC-20260901-001".to_string(),
            proof_image: "uploads/proof-001.jpg".to_string(),
        },
    ))
}

fn decide_proof(
    manager: &BookingsManager,
    booking_id: &str,
    decision: PaymentDecision,
) -> CommandResponse {
    manager.execute_command(admin_cmd(BookingCommandPayload::DecidePaymentProof {
        booking_id: booking_id.to_string(),
        decision,
    }))
}

#[test]
fn test_gcash_proof_approved() {
    let manager = create_test_manager();
    let booking_id = submit_gcash_booking(&manager);

    let resp = submit_proof(&manager, &booking_id);
    assert!(resp.success, "{:?}", resp.error);

    let snapshot = manager.get_snapshot(&booking_id).unwrap().unwrap();
    assert_eq!(snapshot.payment.status, PaymentStatus::GcashPending);
    assert_eq!(
        snapshot.payment.proof_reference.as_deref(),
        Some("GC-20260901-001")
    );
    assert!(snapshot.payment.proof_image.is_some());

    let resp = decide_proof(&manager, &booking_id, PaymentDecision::Approved);
    assert!(resp.success);

    let snapshot = manager.get_snapshot(&booking_id).unwrap().unwrap();
    assert_eq!(snapshot.payment.status, PaymentStatus::Paid);
    // The reference stays on file for reconciliation
    assert!(snapshot.payment.proof_reference.is_some());
}

#[test]
fn test_gcash_proof_rejected_returns_to_unpaid() {
    let manager = create_test_manager();
    let booking_id = submit_gcash_booking(&manager);
    submit_proof(&manager, &booking_id);

    let resp = decide_proof(&manager, &booking_id, PaymentDecision::Rejected);
    assert!(resp.success);

    let snapshot = manager.get_snapshot(&booking_id).unwrap().unwrap();
    assert_eq!(snapshot.payment.status, PaymentStatus::Unpaid);
    // Rejected proof is cleared; the customer can submit a new one
    assert!(snapshot.payment.proof_reference.is_none());
    assert!(snapshot.payment.proof_image.is_none());

    let resp = submit_proof(&manager, &booking_id);
    assert!(resp.success);
}

#[test]
fn test_proof_requires_gcash_method() {
    let manager = create_test_manager();
    let booking_id = submit_booking(&manager, date(1)); // Cash

    let resp = submit_proof(&manager, &booking_id);
    assert!(!resp.success);
    assert_eq!(error_code(&resp), CommandErrorCode::InvalidState);
}

#[test]
fn test_proof_only_from_unpaid() {
    let manager = create_test_manager();
    let booking_id = submit_gcash_booking(&manager);
    submit_proof(&manager, &booking_id);

    // Already pending review
    let resp = submit_proof(&manager, &booking_id);
    assert!(!resp.success);
    assert_eq!(error_code(&resp), CommandErrorCode::InvalidState);
}

#[test]
fn test_decide_without_pending_proof_fails() {
    let manager = create_test_manager();
    let booking_id = submit_gcash_booking(&manager);

    let resp = decide_proof(&manager, &booking_id, PaymentDecision::Approved);
    assert!(!resp.success);
    assert_eq!(error_code(&resp), CommandErrorCode::InvalidState);
}

#[test]
fn test_mark_blocked_while_proof_pending() {
    let manager = create_test_manager();
    let booking_id = submit_gcash_booking(&manager);
    submit_proof(&manager, &booking_id);

    let resp = mark_paid(&manager, &booking_id);
    assert!(!resp.success);
    assert_eq!(error_code(&resp), CommandErrorCode::InvalidState);

    let resp = manager.execute_command(admin_cmd(BookingCommandPayload::MarkUnpaid {
        booking_id: booking_id.clone(),
    }));
    assert!(!resp.success);
    assert_eq!(error_code(&resp), CommandErrorCode::InvalidState);
}

#[test]
fn test_mark_paid_and_back() {
    let manager = create_test_manager();
    let booking_id = submit_booking(&manager, date(1));

    assert!(mark_paid(&manager, &booking_id).success);
    let snapshot = manager.get_snapshot(&booking_id).unwrap().unwrap();
    assert_eq!(snapshot.payment.status, PaymentStatus::Paid);

    let resp = manager.execute_command(admin_cmd(BookingCommandPayload::MarkUnpaid {
        booking_id: booking_id.clone(),
    }));
    assert!(resp.success);
    let snapshot = manager.get_snapshot(&booking_id).unwrap().unwrap();
    assert_eq!(snapshot.payment.status, PaymentStatus::Unpaid);
}

#[test]
fn test_mark_same_status_is_noop() {
    let manager = create_test_manager();
    let booking_id = submit_booking(&manager, date(1));
    let seq_before = manager
        .get_snapshot(&booking_id)
        .unwrap()
        .unwrap()
        .last_sequence;

    let resp = manager.execute_command(admin_cmd(BookingCommandPayload::MarkUnpaid {
        booking_id: booking_id.clone(),
    }));
    assert!(resp.success);
    let snapshot = manager.get_snapshot(&booking_id).unwrap().unwrap();
    assert_eq!(snapshot.last_sequence, seq_before);
}

#[test]
fn test_payment_while_processing() {
    // Payment is orthogonal to fulfillment: paying mid-wash is fine
    let manager = create_test_manager();
    let booking_id = open_order(&manager, date(1));
    advance_order(&manager, &booking_id, None); // Washing

    assert!(mark_paid(&manager, &booking_id).success);
    let snapshot = manager.get_snapshot(&booking_id).unwrap().unwrap();
    assert_eq!(snapshot.status, BookingStatus::Washing);
    assert_eq!(snapshot.payment.status, PaymentStatus::Paid);
    // Paid but not completed: not archived
    assert!(manager.get_history_booking(&booking_id).unwrap().is_none());
}

#[test]
fn test_mark_unpaid_on_archived_booking_fails() {
    let manager = create_test_manager();
    let booking_id = open_order(&manager, date(1));
    run_to_completion(&manager, &booking_id);
    assert!(mark_paid(&manager, &booking_id).success);
    assert!(manager.get_snapshot(&booking_id).unwrap().is_none());

    // Once archived the payment record is settled
    let resp = manager.execute_command(admin_cmd(BookingCommandPayload::MarkUnpaid {
        booking_id: booking_id.clone(),
    }));
    assert!(!resp.success);
    assert_eq!(error_code(&resp), CommandErrorCode::InvalidState);
    let archived = manager.get_history_booking(&booking_id).unwrap().unwrap();
    assert_eq!(archived.payment.status, PaymentStatus::Paid);
}
