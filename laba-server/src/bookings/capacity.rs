//! Daily pickup capacity gate
//!
//! The shop runs a small number of machines, so at most
//! `DAILY_PICKUP_CAPACITY` active bookings are accepted per pickup
//! date. The check runs inside the command's write transaction; redb's
//! single-writer model makes the check-then-insert atomic, so two
//! submissions racing for the last slot cannot both pass.

use super::traits::{BookingError, CommandContext};

/// Maximum active bookings per pickup date
pub const DAILY_PICKUP_CAPACITY: u32 = 3;

/// Reject if the pickup date already holds the maximum active bookings
pub fn check_capacity(ctx: &CommandContext<'_>, date_key: &str) -> Result<(), BookingError> {
    let count = ctx.pickup_count(date_key)?;
    if count >= DAILY_PICKUP_CAPACITY {
        return Err(BookingError::CapacityExceeded {
            date: date_key.to_string(),
            count,
        });
    }
    Ok(())
}
