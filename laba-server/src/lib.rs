//! Laba server - booking/order lifecycle and pricing engine
//!
//! The engine is invoked synchronously per request; all cross-request
//! coordination happens through the redb record store, whose single
//! write transaction at a time makes check-then-act sequences (capacity,
//! status transitions) atomic.

pub mod bookings;
pub mod core;
pub mod pricing;
pub mod utils;

pub use bookings::BookingsManager;
pub use core::config::Config;
