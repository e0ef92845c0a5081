//! Timestamp and price normalization.
//!
//! Upstream APIs disagree on units: CoinGecko and Binance speak millisecond
//! timestamps, Taostats and CoinMarketCap speak ISO-8601 strings, and two of
//! them quote prices as decimal strings. Everything is normalized to
//! `(epoch seconds, f64)` here, before any observation reaches the merge.

use chrono::DateTime;

use crate::FetchError;

/// Converts a millisecond timestamp to whole epoch seconds.
#[must_use]
pub const fn secs_from_millis(millis: i64) -> i64 {
    millis.div_euclid(1000)
}

/// Parses an ISO-8601 / RFC 3339 timestamp to epoch seconds.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] if the string is not a valid timestamp.
pub fn secs_from_iso8601(value: &str) -> Result<i64, FetchError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp())
        .map_err(|e| FetchError::Decode(format!("invalid timestamp '{value}': {e}")))
}

/// Parses a decimal-string price to `f64`.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] if the string is not a number.
pub fn price_from_str(value: &str) -> Result<f64, FetchError> {
    value
        .parse::<f64>()
        .map_err(|e| FetchError::Decode(format!("invalid price '{value}': {e}")))
}
