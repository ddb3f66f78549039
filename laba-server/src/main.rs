use std::path::Path;

use tokio_util::sync::CancellationToken;

use laba_server::bookings::ExpiryScheduler;
use laba_server::utils::logger::init_logger_with_file;
use laba_server::{BookingsManager, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        timezone = %config.timezone,
        "Laba server starting"
    );

    std::fs::create_dir_all(&config.work_dir)?;
    let db_path = Path::new(&config.work_dir).join("bookings.redb");
    let manager = BookingsManager::new(&db_path, config.timezone, config.stage_duration_ms)
        .map_err(|e| anyhow::anyhow!("failed to open booking store: {}", e))?;
    tracing::info!(epoch = %manager.epoch(), db = %db_path.display(), "Booking store ready");

    let shutdown = CancellationToken::new();
    let scheduler = ExpiryScheduler::new(
        manager.clone(),
        shutdown.clone(),
        config.expiry_tick_secs,
    );
    let scheduler_handle = tokio::spawn(scheduler.run());

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    shutdown.cancel();
    let _ = scheduler_handle.await;

    tracing::info!("Laba server stopped");
    Ok(())
}
