//! Taostats price history source.

use async_trait::async_trait;
use pricetape_types::{Cursor, FetchBatch, PricePoint};
use reqwest::Client;
use serde::Deserialize;

use crate::FetchError;
use crate::normalize::{price_from_str, secs_from_iso8601};
use crate::source::{DAY_SECS, PriceSource, batch_for, now_secs, read_json, request_window};

/// Default Taostats API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.taostats.io";

// The endpoint returns at most 200 entries per request; with daily
// observations a 200-day page keeps each request within that limit.
const PAGE_SECS: i64 = 200 * DAY_SECS;

/// Taostats `/api/price/history/v1` source.
///
/// Authenticates with the API key in the `Authorization` header. Timestamps
/// arrive as ISO-8601 strings and prices as decimal strings; both are
/// normalized before leaving this source.
#[derive(Debug, Clone)]
pub struct Taostats {
    base_url: String,
    asset: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    data: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct HistoryEntry {
    timestamp: String,
    price: String,
}

impl Taostats {
    /// Creates a source for the given asset (e.g. `tao`).
    pub fn new(asset: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            asset: asset.into(),
            api_key: api_key.into(),
        }
    }

    /// Overrides the API endpoint (used in tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl PriceSource for Taostats {
    fn name(&self) -> &'static str {
        "taostats"
    }

    fn max_window_secs(&self) -> i64 {
        // Full history is reachable; only the per-request entry limit
        // matters, and that is what the page size accounts for.
        i64::MAX
    }

    async fn fetch(&self, client: &Client, cursor: Cursor) -> Result<FetchBatch, FetchError> {
        let Some((start, end)) = request_window(cursor, now_secs(), i64::MAX, PAGE_SECS) else {
            return Ok(FetchBatch::exhausted(Vec::new()));
        };

        let url = format!("{}/api/price/history/v1", self.base_url);
        let query = [
            ("asset", self.asset.clone()),
            ("timestamp_start", start.to_string()),
            ("timestamp_end", end.to_string()),
            ("limit", "200".to_string()),
        ];

        let response = client
            .get(&url)
            .header("Authorization", &self.api_key)
            .query(&query)
            .send()
            .await?;
        let history: HistoryResponse = read_json(response, "taostats price history").await?;

        let points = history
            .data
            .into_iter()
            .map(|entry| {
                Ok(PricePoint::new(
                    secs_from_iso8601(&entry.timestamp)?,
                    price_from_str(&entry.price)?,
                ))
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        Ok(batch_for(cursor, points))
    }
}
