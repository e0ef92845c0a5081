//! Price observation representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single price observation.
///
/// Serializes to and from the two-element JSON array `[timestamp, price]`,
/// which is the persisted layout consumed by the charting front end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(i64, f64)", into = "(i64, f64)")]
pub struct PricePoint {
    /// Unix timestamp in seconds (UTC).
    pub timestamp: i64,
    /// Price in the quote currency.
    pub price: f64,
}

impl PricePoint {
    /// Creates a new price point.
    #[must_use]
    pub const fn new(timestamp: i64, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Returns the timestamp as a UTC datetime, if representable.
    #[must_use]
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

impl From<(i64, f64)> for PricePoint {
    fn from((timestamp, price): (i64, f64)) -> Self {
        Self { timestamp, price }
    }
}

impl From<PricePoint> for (i64, f64) {
    fn from(point: PricePoint) -> Self {
        (point.timestamp, point.price)
    }
}
