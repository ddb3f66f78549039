//! Time helpers - business timezone conversions
//!
//! Storage only ever sees `NaiveDate` keys and `i64` Unix millis.

use chrono::NaiveDate;
use chrono_tz::Tz;

/// Format a date as the YYYY-MM-DD key used by the date index
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Compact YYYYMMDD stamp for booking numbers
pub fn number_date_stamp(tz: Tz) -> String {
    chrono::Utc::now()
        .with_timezone(&tz)
        .format("%Y%m%d")
        .to_string()
}
