//! Booking lifecycle engine
//!
//! Event-sourced: commands are validated against the current snapshot,
//! produce immutable events, and appliers fold those events back into
//! the snapshot. Everything for one command persists in a single redb
//! write transaction.

// traits must expand before appliers: enum_dispatch emits the generated
// `impl EventApplier for EventAction` at the later of the two macro
// sites, and only appliers/mod.rs has every applier type in scope.
pub mod traits;

pub mod actions;
pub mod appliers;
pub mod capacity;
pub mod expiry_scheduler;
pub mod manager;
pub mod reducer;
pub mod storage;
pub mod timer;

pub use expiry_scheduler::ExpiryScheduler;
pub use manager::BookingsManager;
pub use storage::BookingStorage;
