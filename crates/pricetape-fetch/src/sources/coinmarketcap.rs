//! CoinMarketCap historical quotes source.

use async_trait::async_trait;
use pricetape_types::{Cursor, FetchBatch, PricePoint};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::FetchError;
use crate::normalize::secs_from_iso8601;
use crate::source::{DAY_SECS, PriceSource, batch_for, now_secs, read_json, request_window};

/// Default CoinMarketCap API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://pro-api.coinmarketcap.com";

const MAX_WINDOW_SECS: i64 = 365 * DAY_SECS;
const PAGE_SECS: i64 = 365 * DAY_SECS;

/// CoinMarketCap `/v2/cryptocurrency/quotes/historical` source.
///
/// Authenticates with the API key in the vendor's `X-CMC_PRO_API_KEY`
/// header. Quotes arrive nested per convert-currency with ISO-8601
/// timestamps.
#[derive(Debug, Clone)]
pub struct CoinMarketCap {
    base_url: String,
    symbol: String,
    convert: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    data: HistoricalData,
}

#[derive(Debug, Deserialize)]
struct HistoricalData {
    quotes: Vec<QuoteEntry>,
}

#[derive(Debug, Deserialize)]
struct QuoteEntry {
    timestamp: String,
    quote: HashMap<String, QuotePrice>,
}

#[derive(Debug, Deserialize)]
struct QuotePrice {
    price: f64,
}

impl CoinMarketCap {
    /// Creates a source for the given symbol (e.g. `TAO`) converted to the
    /// given currency (e.g. `USD`).
    pub fn new(
        symbol: impl Into<String>,
        convert: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            symbol: symbol.into(),
            convert: convert.into(),
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
impl PriceSource for CoinMarketCap {
    fn name(&self) -> &'static str {
        "coinmarketcap"
    }

    fn max_window_secs(&self) -> i64 {
        MAX_WINDOW_SECS
    }

    async fn fetch(&self, client: &Client, cursor: Cursor) -> Result<FetchBatch, FetchError> {
        let Some((start, end)) = request_window(cursor, now_secs(), MAX_WINDOW_SECS, PAGE_SECS)
        else {
            return Ok(FetchBatch::exhausted(Vec::new()));
        };

        let url = format!("{}/v2/cryptocurrency/quotes/historical", self.base_url);
        let query = [
            ("symbol", self.symbol.clone()),
            ("convert", self.convert.clone()),
            ("time_start", start.to_string()),
            ("time_end", end.to_string()),
            ("interval", "daily".to_string()),
        ];

        let response = client
            .get(&url)
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .query(&query)
            .send()
            .await?;
        let historical: HistoricalResponse =
            read_json(response, "coinmarketcap historical quotes").await?;

        let convert = self.convert.to_uppercase();
        let points = historical
            .data
            .quotes
            .into_iter()
            .map(|entry| {
                let quote = entry.quote.get(&convert).ok_or_else(|| {
                    FetchError::Decode(format!("missing {convert} quote in cmc response"))
                })?;
                Ok(PricePoint::new(
                    secs_from_iso8601(&entry.timestamp)?,
                    quote.price,
                ))
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        Ok(batch_for(cursor, points))
    }
}
