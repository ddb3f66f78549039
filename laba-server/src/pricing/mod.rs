//! Pricing engine
//!
//! Deterministic price computation for bookings: catalog prices per
//! load, post-inspection add-on prices, and barangay-tiered delivery
//! fees. All arithmetic goes through rust_decimal and is rounded to
//! 2 decimal places before storage as f64.

pub mod calculator;
pub mod catalog;
pub mod delivery;
pub mod money;

pub use calculator::{compute_pricing, PricingError};
pub use delivery::{resolve_delivery_fee, STANDARD_DELIVERY_FEE};
