//! Binance klines source.

use async_trait::async_trait;
use pricetape_types::{Cursor, FetchBatch, PricePoint};
use reqwest::Client;
use serde_json::Value;

use crate::FetchError;
use crate::normalize::{price_from_str, secs_from_millis};
use crate::source::{DAY_SECS, PriceSource, batch_for, now_secs, read_json, request_window};

/// Default Binance API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

// Klines are capped at 1000 entries per request; daily candles make that
// 1000 days per page.
const PAGE_SECS: i64 = 1000 * DAY_SECS;

/// Binance `/api/v3/klines` source.
///
/// Historical klines are a public endpoint, so this source carries no
/// credential. Each kline is an array; the open time (milliseconds) and the
/// close price (decimal string) become the observation.
#[derive(Debug, Clone)]
pub struct Binance {
    base_url: String,
    symbol: String,
}

impl Binance {
    /// Creates a source for the given trading pair (e.g. `TAOUSDT`).
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            symbol: symbol.into(),
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
impl PriceSource for Binance {
    fn name(&self) -> &'static str {
        "binance"
    }

    fn max_window_secs(&self) -> i64 {
        // Klines reach back to a pair's listing date; no horizon to clamp to.
        i64::MAX
    }

    async fn fetch(&self, client: &Client, cursor: Cursor) -> Result<FetchBatch, FetchError> {
        let Some((start, end)) = request_window(cursor, now_secs(), i64::MAX, PAGE_SECS) else {
            return Ok(FetchBatch::exhausted(Vec::new()));
        };

        let url = format!("{}/api/v3/klines", self.base_url);
        let query = [
            ("symbol", self.symbol.to_uppercase()),
            ("interval", "1d".to_string()),
            ("startTime", (start * 1000).to_string()),
            ("endTime", (end * 1000 + 999).to_string()),
            ("limit", "1000".to_string()),
        ];

        let response = client.get(&url).query(&query).send().await?;
        // Klines are heterogeneous arrays; only the open time (index 0) and
        // the close price (index 4) are of interest.
        let klines: Vec<Vec<Value>> = read_json(response, "binance klines").await?;

        let points = klines
            .into_iter()
            .map(|row| {
                let open_millis = row
                    .first()
                    .and_then(Value::as_i64)
                    .ok_or_else(|| FetchError::Decode("kline missing open time".to_string()))?;
                let close = row
                    .get(4)
                    .and_then(Value::as_str)
                    .ok_or_else(|| FetchError::Decode("kline missing close price".to_string()))?;
                Ok(PricePoint::new(
                    secs_from_millis(open_millis),
                    price_from_str(close)?,
                ))
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        Ok(batch_for(cursor, points))
    }
}
