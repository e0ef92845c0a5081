//! The upstream source abstraction.

use async_trait::async_trait;
use chrono::Utc;
use pricetape_types::{Cursor, FetchBatch, PricePoint};
use reqwest::Client;

use crate::FetchError;
use crate::error::body_excerpt;

/// One day in seconds.
pub const DAY_SECS: i64 = 86_400;

/// An upstream market-data API.
///
/// Each implementation translates a [`Cursor`] into one vendor request and
/// normalizes the response into a [`FetchBatch`] of epoch-second
/// observations. Implementations are stateless beyond their configuration
/// and never mutate persisted state.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Short identifier for diagnostics.
    fn name(&self) -> &'static str;

    /// How far back from now this source can serve history, in seconds.
    ///
    /// Incremental callers clamp their requested window to this rather than
    /// assume unlimited history, and backfill terminates cleanly once the
    /// boundary reaches this horizon. Uncapped sources report `i64::MAX`.
    fn max_window_secs(&self) -> i64;

    /// Fetches one batch at the given cursor.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] on transport failure, non-success status, or
    /// a response body that cannot be decoded.
    async fn fetch(&self, client: &Client, cursor: Cursor) -> Result<FetchBatch, FetchError>;
}

/// Resolves a cursor into an inclusive `(start, end)` epoch-second window.
///
/// `Since` windows run up to now, clamped to `max_window_secs`; `Before`
/// windows cover one `page_secs`-wide page strictly older than the boundary,
/// floored at the source's history horizon. Returns `None` when the window
/// is empty (the boundary has reached the horizon or the epoch), in which
/// case no request needs to be made.
pub(crate) fn request_window(
    cursor: Cursor,
    now: i64,
    max_window_secs: i64,
    page_secs: i64,
) -> Option<(i64, i64)> {
    let (start, end) = match cursor {
        Cursor::Since(ts) => ((ts + 1).max(now.saturating_sub(max_window_secs)), now),
        Cursor::Before(ts) => {
            // Capped sources reject requests beyond their horizon; stop
            // paginating there instead of erroring mid-backfill.
            let floor = now.saturating_sub(max_window_secs).max(0);
            ((ts.saturating_sub(page_secs)).max(floor), ts - 1)
        }
    };
    (start <= end).then_some((start, end))
}

/// Wraps normalized points into a batch, deriving the continuation cursor.
///
/// A `Before` page steps backward to just-before its oldest point; a `Since`
/// fetch never continues.
pub(crate) fn batch_for(cursor: Cursor, points: Vec<PricePoint>) -> FetchBatch {
    match cursor {
        Cursor::Since(_) => FetchBatch::exhausted(points),
        Cursor::Before(_) => {
            let next = points.iter().map(|p| p.timestamp).min().map(Cursor::Before);
            FetchBatch::new(points, next)
        }
    }
}

/// Reads a response body, mapping non-success statuses and undecodable
/// bodies to the corresponding [`FetchError`] variants.
pub(crate) async fn read_json<T>(response: reqwest::Response, what: &str) -> Result<T, FetchError>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            body: body_excerpt(&body),
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| FetchError::Decode(format!("{what}: {e} (body: {})", body_excerpt(&body))))
}

/// Current time as epoch seconds.
pub(crate) fn now_secs() -> i64 {
    Utc::now().timestamp()
}
