//! Booking Event Sourcing Module
//!
//! This module provides types for the booking event sourcing system:
//! - Commands: requests from clients/admins to mutate bookings
//! - Events: immutable facts recorded after command processing
//! - Snapshots: computed BookingOrder state from the event stream

pub mod catalog;
pub mod command;
pub mod event;
pub mod snapshot;
pub mod types;

// Re-exports
pub use catalog::{AddOnService, Barangay, MainService};
pub use command::{BookingCommand, BookingCommandPayload};
pub use event::{BookingEvent, BookingEventType, EventPayload};
pub use snapshot::{BookingSnapshot, BookingStatus, PaymentState, PricingSnapshot, TimerState};
pub use types::*;
