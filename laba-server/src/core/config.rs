/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/laba | Work directory (database, logs) |
/// | TIMEZONE | Asia/Manila | Business timezone |
/// | STAGE_DURATION_MS | 3600000 | Processing-stage timer duration |
/// | EXPIRY_TICK_SECS | 30 | Expiry scheduler poll interval |
/// | LOG_LEVEL | info | Tracing level |
/// | LOG_DIR | (unset) | Optional rolling log file directory |
/// | ENVIRONMENT | development | development \| staging \| production |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/laba LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory for the database and log files
    pub work_dir: String,
    /// Business timezone (booking numbers, business dates)
    pub timezone: chrono_tz::Tz,
    /// Fixed duration for washing/drying/folding stages (milliseconds)
    pub stage_duration_ms: i64,
    /// Expiry scheduler poll interval (seconds)
    pub expiry_tick_secs: u64,
    /// Tracing level
    pub log_level: String,
    /// Optional directory for daily-rolling log files
    pub log_dir: Option<String>,
    /// Running environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults when unset
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/laba".into()),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::Asia::Manila),
            stage_duration_ms: std::env::var("STAGE_DURATION_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3_600_000),
            expiry_tick_secs: std::env::var("EXPIRY_TICK_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
