//! The persisted price series and its merge operation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::PricePoint;

/// A chronologically ordered price series with unique timestamps.
///
/// The invariant (strictly increasing timestamps, no duplicates) is enforced
/// by every constructor, so any `Series` in hand is safe to persist as-is.
/// Serializes as a JSON array of `[timestamp, price]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct Series {
    points: Vec<PricePoint>,
}

impl Series {
    /// Creates an empty series.
    #[must_use]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Creates a series from arbitrary points, sorting by timestamp and
    /// dropping duplicates.
    ///
    /// On duplicate timestamps the earliest occurrence in `points` wins,
    /// matching the merge policy that already-known entries are canonical.
    #[must_use]
    pub fn from_points(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        points.dedup_by_key(|p| p.timestamp);
        Self { points }
    }

    /// Merges incoming observations into this series.
    ///
    /// Builds the union keyed by timestamp; on a collision the entry already
    /// in `self` wins and the incoming value is discarded. The result is
    /// sorted ascending with unique timestamps. Merging the same input twice
    /// yields the same series as merging it once.
    #[must_use]
    pub fn merge<I>(&self, incoming: I) -> Self
    where
        I: IntoIterator<Item = PricePoint>,
    {
        let mut union: BTreeMap<i64, f64> = incoming
            .into_iter()
            .map(|p| (p.timestamp, p.price))
            .collect();

        // Existing entries overwrite incoming ones at the same timestamp.
        for point in &self.points {
            union.insert(point.timestamp, point.price);
        }

        Self {
            points: union
                .into_iter()
                .map(|(timestamp, price)| PricePoint::new(timestamp, price))
                .collect(),
        }
    }

    /// Returns the points in chronological order.
    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Consumes the series, returning its points.
    #[must_use]
    pub fn into_points(self) -> Vec<PricePoint> {
        self.points
    }

    /// Returns the number of observations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the series holds no observations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the oldest observation.
    #[must_use]
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Returns the most recent observation.
    #[must_use]
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Returns the timestamp of the most recent observation.
    ///
    /// This is the "since" cursor for an incremental update.
    #[must_use]
    pub fn last_timestamp(&self) -> Option<i64> {
        self.points.last().map(|p| p.timestamp)
    }
}

impl From<Vec<PricePoint>> for Series {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::from_points(points)
    }
}

impl From<Series> for Vec<PricePoint> {
    fn from(series: Series) -> Self {
        series.points
    }
}

impl FromIterator<PricePoint> for Series {
    fn from_iter<I: IntoIterator<Item = PricePoint>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(pairs: &[(i64, f64)]) -> Series {
        Series::from_points(pairs.iter().map(|&(t, p)| PricePoint::new(t, p)).collect())
    }

    fn pairs(series: &Series) -> Vec<(i64, f64)> {
        series.points().iter().map(|p| (p.timestamp, p.price)).collect()
    }

    #[test]
    fn test_from_points_sorts_and_dedups() {
        let s = series(&[(300, 3.0), (100, 1.0), (300, 9.9), (200, 2.0)]);
        assert_eq!(pairs(&s), vec![(100, 1.0), (200, 2.0), (300, 3.0)]);
    }

    #[test]
    fn test_merge_empty_is_identity() {
        let s = series(&[(100, 1.0), (200, 2.0)]);
        let merged = s.merge(std::iter::empty());
        assert_eq!(merged, s);
    }

    #[test]
    fn test_merge_existing_wins_on_collision() {
        let existing = series(&[(100, 1.0), (200, 2.0)]);
        let incoming = [
            PricePoint::new(150, 1.5),
            PricePoint::new(200, 9.9),
            PricePoint::new(300, 3.0),
        ];
        let merged = existing.merge(incoming);
        assert_eq!(
            pairs(&merged),
            vec![(100, 1.0), (150, 1.5), (200, 2.0), (300, 3.0)]
        );
    }

    #[test]
    fn test_merge_is_sorted_and_unique() {
        let existing = series(&[(500, 5.0), (100, 1.0)]);
        let incoming = [
            PricePoint::new(300, 3.0),
            PricePoint::new(100, 7.7),
            PricePoint::new(300, 3.1),
        ];
        let merged = existing.merge(incoming);

        let timestamps: Vec<i64> = merged.points().iter().map(|p| p.timestamp).collect();
        let mut sorted = timestamps.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(timestamps, sorted);
    }

    #[test]
    fn test_merge_idempotent() {
        let existing = series(&[(100, 1.0)]);
        let incoming = [PricePoint::new(200, 2.0), PricePoint::new(300, 3.0)];

        let once = existing.merge(incoming);
        let twice = once.merge(incoming);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_into_empty() {
        let merged = Series::new().merge([PricePoint::new(200, 2.0), PricePoint::new(100, 1.0)]);
        assert_eq!(pairs(&merged), vec![(100, 1.0), (200, 2.0)]);
    }

    #[test]
    fn test_last_timestamp() {
        assert_eq!(Series::new().last_timestamp(), None);
        let s = series(&[(100, 1.0), (200, 2.0)]);
        assert_eq!(s.last_timestamp(), Some(200));
    }

    #[test]
    fn test_json_round_trip() {
        let s = series(&[(100, 1.0), (200, 2.5)]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "[[100,1.0],[200,2.5]]");

        let back: Series = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_deserialization_normalizes() {
        let back: Series = serde_json::from_str("[[200,2.0],[100,1.0],[200,9.9]]").unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.last_timestamp(), Some(200));
        assert_relative_eq!(back.points()[1].price, 2.0);
    }
}
