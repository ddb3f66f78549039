//! Stage expiry scheduler
//!
//! Polls active orders on a fixed tick and issues an auto AdvanceOrder
//! for every timed stage whose deadline has passed, when the order has
//! auto-advance enabled. The scheduler is just another command issuer:
//! the manager's optimistic-concurrency guard turns a tick that races a
//! manual advance into a no-op, and missing a tick only delays the
//! advance until the next one.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::manager::BookingsManager;
use shared::booking::{BookingCommand, BookingCommandPayload};

/// Actor identity stamped on scheduler-issued commands
const SCHEDULER_ACTOR_ID: &str = "system-scheduler";
const SCHEDULER_ACTOR_NAME: &str = "Stage Scheduler";

/// Stage expiry scheduler
pub struct ExpiryScheduler {
    manager: BookingsManager,
    shutdown: CancellationToken,
    tick: Duration,
}

impl ExpiryScheduler {
    pub fn new(manager: BookingsManager, shutdown: CancellationToken, tick_secs: u64) -> Self {
        Self {
            manager,
            shutdown,
            tick: Duration::from_secs(tick_secs),
        }
    }

    /// Main loop: tick until shutdown
    pub async fn run(self) {
        tracing::info!(tick_secs = self.tick.as_secs(), "Expiry scheduler started");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.tick) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Expiry scheduler received shutdown signal");
                    break;
                }
            }
            self.tick_once();
        }

        tracing::info!("Expiry scheduler stopped");
    }

    /// Scan for expired stage timers and advance each due order
    fn tick_once(&self) {
        let now = shared::util::now_millis();
        let due = match self.manager.due_auto_advances(now) {
            Ok(due) => due,
            Err(e) => {
                tracing::error!(error = %e, "Expiry scan failed");
                return;
            }
        };

        for (booking_id, observed_status) in due {
            let cmd = BookingCommand::new(
                SCHEDULER_ACTOR_ID,
                SCHEDULER_ACTOR_NAME,
                BookingCommandPayload::AdvanceOrder {
                    booking_id: booking_id.clone(),
                    // Guard with the status we scanned; if an admin
                    // advanced meanwhile, this command degrades to a
                    // duplicate no-op
                    expected_status: Some(observed_status),
                    auto: true,
                },
            );

            let response = self.manager.execute_command(cmd);
            if response.success {
                tracing::info!(
                    booking_id = %booking_id,
                    from = %observed_status,
                    "Auto-advanced expired stage"
                );
            } else {
                tracing::warn!(
                    booking_id = %booking_id,
                    error = ?response.error,
                    "Auto-advance rejected"
                );
            }
        }
    }
}
