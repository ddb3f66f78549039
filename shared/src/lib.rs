//! Shared types for the Laba laundry platform
//!
//! Common types used by the server and any client integration:
//! booking commands, events, snapshots, catalog enums and utility
//! helpers.

pub mod booking;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use booking::{
    BookingCommand, BookingCommandPayload, BookingEvent, BookingEventType, BookingSnapshot,
    BookingStatus, CommandError, CommandErrorCode, CommandResponse, EventPayload,
};
