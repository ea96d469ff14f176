//! Calendar-day keys for grouping forecast samples

use chrono::{DateTime, Utc};

/// Maps an instant to its UTC calendar date as `YYYY-MM-DD`
///
/// The host timezone is never consulted, so two instants on the same UTC day
/// always share a key.
pub fn day_key(instant: &DateTime<Utc>) -> String {
    instant.date_naive().format("%Y-%m-%d").to_string()
}
