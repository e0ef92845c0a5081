//! Cursors into an upstream source's history, and the batches they yield.

use crate::PricePoint;

/// A position in an upstream source's pagination space.
///
/// All boundaries are Unix epoch seconds, regardless of the units the
/// upstream API speaks natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Request observations strictly newer than this timestamp
    /// (incremental top-up).
    Since(i64),
    /// Request observations strictly older than this timestamp
    /// (backward pagination during backfill).
    Before(i64),
}

/// The result of a single fetch step.
#[derive(Debug, Clone)]
pub struct FetchBatch {
    /// Observations returned by this step, already normalized to epoch
    /// seconds.
    pub points: Vec<PricePoint>,
    /// Cursor for the next (older) page, or `None` when the source has no
    /// further history behind this batch.
    pub next: Option<Cursor>,
}

impl FetchBatch {
    /// Creates a batch with a continuation cursor.
    #[must_use]
    pub const fn new(points: Vec<PricePoint>, next: Option<Cursor>) -> Self {
        Self { points, next }
    }

    /// Creates a batch that marks the source as exhausted.
    #[must_use]
    pub const fn exhausted(points: Vec<PricePoint>) -> Self {
        Self { points, next: None }
    }

    /// Returns true if the batch holds no observations.
    ///
    /// An empty batch always means the source is exhausted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the number of observations in the batch.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns the oldest timestamp in the batch.
    #[must_use]
    pub fn oldest_timestamp(&self) -> Option<i64> {
        self.points.iter().map(|p| p.timestamp).min()
    }
}
