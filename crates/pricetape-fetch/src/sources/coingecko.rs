//! CoinGecko market chart source.

use async_trait::async_trait;
use pricetape_types::{Cursor, FetchBatch, PricePoint};
use reqwest::Client;
use serde::Deserialize;

use crate::FetchError;
use crate::normalize::secs_from_millis;
use crate::source::{DAY_SECS, PriceSource, batch_for, now_secs, read_json, request_window};

/// Default CoinGecko API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

// Demo-tier keys are capped at 365 days of history.
const MAX_WINDOW_SECS: i64 = 365 * DAY_SECS;
const PAGE_SECS: i64 = 90 * DAY_SECS;

/// CoinGecko `/coins/{id}/market_chart/range` source.
///
/// Authenticates via the `x_cg_demo_api_key` query parameter. Timestamps
/// arrive in milliseconds and are normalized to epoch seconds.
#[derive(Debug, Clone)]
pub struct CoinGecko {
    base_url: String,
    coin_id: String,
    vs_currency: String,
    api_key: String,
}

/// Response body of `market_chart/range`.
#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<(i64, f64)>,
}

impl CoinGecko {
    /// Creates a source for the given coin id (e.g. `bittensor`) and quote
    /// currency (e.g. `usd`).
    pub fn new(
        coin_id: impl Into<String>,
        vs_currency: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            coin_id: coin_id.into(),
            vs_currency: vs_currency.into(),
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
impl PriceSource for CoinGecko {
    fn name(&self) -> &'static str {
        "coingecko"
    }

    fn max_window_secs(&self) -> i64 {
        MAX_WINDOW_SECS
    }

    async fn fetch(&self, client: &Client, cursor: Cursor) -> Result<FetchBatch, FetchError> {
        let Some((start, end)) = request_window(cursor, now_secs(), MAX_WINDOW_SECS, PAGE_SECS)
        else {
            return Ok(FetchBatch::exhausted(Vec::new()));
        };

        let url = format!(
            "{}/coins/{}/market_chart/range",
            self.base_url, self.coin_id
        );
        let query = [
            ("vs_currency", self.vs_currency.clone()),
            ("from", start.to_string()),
            ("to", end.to_string()),
            ("x_cg_demo_api_key", self.api_key.clone()),
        ];

        let response = client.get(&url).query(&query).send().await?;
        let chart: MarketChart = read_json(response, "coingecko market_chart").await?;

        let points = chart
            .prices
            .into_iter()
            .map(|(millis, price)| PricePoint::new(secs_from_millis(millis), price))
            .collect();

        Ok(batch_for(cursor, points))
    }
}
