//! Delivery fee resolver
//!
//! Maps a barangay and load count to a delivery fee tier. Pure and
//! deterministic. Rule order:
//!
//! 1. free-list barangay AND load_count >= 2 -> 0 (waiver)
//! 2. barangay with a listed special fee -> that fee
//! 3. anything else, including Unknown -> standard fee (fail-open)

use shared::booking::Barangay;

/// Standard fee for unlisted Calamba barangays
pub const STANDARD_DELIVERY_FEE: f64 = 50.0;

/// Minimum loads for the free-delivery waiver
pub const FREE_DELIVERY_MIN_LOADS: u32 = 2;

/// Barangays near the shop with free delivery at 2+ loads
const FREE_LIST: &[Barangay] = &[
    Barangay::Halang,
    Barangay::Parian,
    Barangay::Real,
    Barangay::Lecheria,
    Barangay::Uno,
    Barangay::Dos,
    Barangay::Tres,
];

/// Listed special fees for farther barangays
fn special_fee(barangay: Barangay) -> Option<f64> {
    match barangay {
        Barangay::Canlubang => Some(100.0),
        Barangay::Turbina => Some(90.0),
        Barangay::Pansol => Some(80.0),
        Barangay::Makiling => Some(70.0),
        Barangay::Bubuyan => Some(70.0),
        Barangay::Banlic => Some(60.0),
        Barangay::Mayapa => Some(60.0),
        Barangay::SirangLupa => Some(60.0),
        _ => None,
    }
}

/// Resolve the delivery fee for a barangay and load count
pub fn resolve_delivery_fee(barangay: Barangay, load_count: u32) -> f64 {
    if FREE_LIST.contains(&barangay) && load_count >= FREE_DELIVERY_MIN_LOADS {
        return 0.0;
    }
    special_fee(barangay).unwrap_or(STANDARD_DELIVERY_FEE)
}
