//! Fetch drivers: incremental top-up and backward backfill.

use pricetape_types::{Cursor, FetchBatch, PricePoint};
use reqwest::Client;

use crate::{ClientConfig, FetchError, PriceSource, source::now_secs};

/// Fetches everything strictly newer than `since` in a single step.
///
/// The source clamps the window to its own maximum; no pagination is
/// attempted.
///
/// # Errors
///
/// Propagates any [`FetchError`] from the fetch step.
pub async fn top_up(
    source: &dyn PriceSource,
    client: &Client,
    since: i64,
) -> Result<Vec<FetchBatch>, FetchError> {
    let batch = source.fetch(client, Cursor::Since(since)).await?;
    Ok(vec![batch])
}

/// Reconstructs full history by paginating backward from now.
///
/// Starts at `Before(now)` and repeats: fetch one page, stop on an empty
/// page (source exhausted), otherwise accumulate it and step to the returned
/// cursor. The loop is bounded by [`ClientConfig::max_pages`] and sleeps
/// [`ClientConfig::pause`] between successive requests to respect the
/// source's rate limit. `on_page` is invoked once per accumulated page.
///
/// # Errors
///
/// Any single step's failure aborts the whole backfill; accumulated pages
/// are dropped with it, so the caller never persists a series with an
/// invisible gap.
pub async fn backfill(
    source: &dyn PriceSource,
    client: &Client,
    config: &ClientConfig,
    mut on_page: impl FnMut(&FetchBatch),
) -> Result<Vec<FetchBatch>, FetchError> {
    let mut cursor = Cursor::Before(now_secs());
    let mut batches = Vec::new();

    for _ in 0..config.max_pages {
        let batch = source.fetch(client, cursor).await?;
        if batch.is_empty() {
            break;
        }

        on_page(&batch);
        let next = batch.next;
        batches.push(batch);

        let Some(next) = next else { break };
        cursor = next;

        if !config.pause.is_zero() {
            tokio::time::sleep(config.pause).await;
        }
    }

    Ok(batches)
}

/// Flattens fetched batches into one candidate sequence for the merge.
#[must_use]
pub fn flatten_batches(batches: Vec<FetchBatch>) -> Vec<PricePoint> {
    batches.into_iter().flat_map(|b| b.points).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// A scripted source that serves pre-baked pages in order.
    struct ScriptedSource {
        pages: Mutex<Vec<Result<FetchBatch, FetchError>>>,
        cursors_seen: Mutex<Vec<Cursor>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Result<FetchBatch, FetchError>>) -> Self {
            Self {
                pages: Mutex::new(pages),
                cursors_seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PriceSource for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn max_window_secs(&self) -> i64 {
            i64::MAX
        }

        async fn fetch(
            &self,
            _client: &Client,
            cursor: Cursor,
        ) -> Result<FetchBatch, FetchError> {
            self.cursors_seen.lock().unwrap().push(cursor);
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                Ok(FetchBatch::exhausted(Vec::new()))
            } else {
                pages.remove(0)
            }
        }
    }

    fn page(timestamps: &[i64]) -> FetchBatch {
        let points: Vec<PricePoint> = timestamps
            .iter()
            .map(|&t| PricePoint::new(t, t as f64))
            .collect();
        let next = points.iter().map(|p| p.timestamp).min().map(Cursor::Before);
        FetchBatch::new(points, next)
    }

    fn quick_config() -> ClientConfig {
        ClientConfig {
            pause: Duration::ZERO,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_backfill_terminates_on_empty_page() {
        let source = ScriptedSource::new(vec![
            Ok(page(&[300, 400])),
            Ok(page(&[100, 200])),
            Ok(FetchBatch::exhausted(Vec::new())),
        ]);
        let client = Client::new();

        let batches = backfill(&source, &client, &quick_config(), |_| {})
            .await
            .unwrap();

        assert_eq!(batches.len(), 2);
        let points = flatten_batches(batches);
        let mut timestamps: Vec<i64> = points.iter().map(|p| p.timestamp).collect();
        timestamps.sort_unstable();
        assert_eq!(timestamps, vec![100, 200, 300, 400]);
    }

    #[tokio::test]
    async fn test_backfill_steps_cursor_backward() {
        let source = ScriptedSource::new(vec![
            Ok(page(&[300, 400])),
            Ok(page(&[100, 200])),
            Ok(FetchBatch::exhausted(Vec::new())),
        ]);
        let client = Client::new();

        backfill(&source, &client, &quick_config(), |_| {})
            .await
            .unwrap();

        let cursors = source.cursors_seen.lock().unwrap();
        assert_eq!(cursors.len(), 3);
        assert_eq!(cursors[1], Cursor::Before(300));
        assert_eq!(cursors[2], Cursor::Before(100));
    }

    #[tokio::test]
    async fn test_backfill_respects_max_pages() {
        // Endless source: every page continues.
        let pages: Vec<Result<FetchBatch, FetchError>> =
            (0..100).map(|i| Ok(page(&[1_000 - i]))).collect();
        let source = ScriptedSource::new(pages);
        let client = Client::new();

        let config = ClientConfig {
            max_pages: 5,
            pause: Duration::ZERO,
            ..Default::default()
        };
        let batches = backfill(&source, &client, &config, |_| {}).await.unwrap();
        assert_eq!(batches.len(), 5);
    }

    #[tokio::test]
    async fn test_backfill_aborts_on_failure() {
        let source = ScriptedSource::new(vec![
            Ok(page(&[300, 400])),
            Err(FetchError::Status {
                status: 500,
                body: "boom".to_string(),
            }),
            Ok(page(&[100, 200])),
        ]);
        let client = Client::new();

        let result = backfill(&source, &client, &quick_config(), |_| {}).await;
        assert!(matches!(
            result,
            Err(FetchError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_backfill_invokes_page_hook_once_per_page() {
        let source = ScriptedSource::new(vec![
            Ok(page(&[300])),
            Ok(page(&[200])),
            Ok(page(&[100])),
            Ok(FetchBatch::exhausted(Vec::new())),
        ]);
        let client = Client::new();

        let mut seen = 0usize;
        backfill(&source, &client, &quick_config(), |_| seen += 1)
            .await
            .unwrap();
        assert_eq!(seen, 3);
    }

    #[tokio::test]
    async fn test_top_up_is_single_step() {
        let source = ScriptedSource::new(vec![Ok(FetchBatch::exhausted(vec![
            PricePoint::new(500, 5.0),
        ]))]);
        let client = Client::new();

        let batches = top_up(&source, &client, 400).await.unwrap();
        assert_eq!(batches.len(), 1);

        let cursors = source.cursors_seen.lock().unwrap();
        assert_eq!(*cursors, vec![Cursor::Since(400)]);
    }
}
