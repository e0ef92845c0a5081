//! CLI argument mapping and output helpers for the pricetape CLI.

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::ValueEnum;
use pricetape_fetch::PriceSource;
use pricetape_fetch::sources::{Binance, CoinGecko, CoinMarketCap, Taostats};

/// Upstream market-data API to fetch from.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum SourceArg {
    Coingecko,
    Taostats,
    Coinmarketcap,
    Binance,
}

impl SourceArg {
    /// Environment variable holding the source's API key, if it needs one.
    pub(crate) const fn env_key(self) -> Option<&'static str> {
        match self {
            Self::Coingecko => Some("COINGECKO_API_KEY"),
            Self::Taostats => Some("TAOSTATS_API_KEY"),
            Self::Coinmarketcap => Some("CMC_API_KEY"),
            Self::Binance => None,
        }
    }

    /// Builds the source, resolving its credential from the environment.
    ///
    /// Fails before any network I/O when a required key is missing.
    pub(crate) fn build(
        self,
        asset: &str,
        vs_currency: &str,
        base_url: Option<&str>,
    ) -> Result<Box<dyn PriceSource>> {
        let api_key = match self.env_key() {
            Some(var) => std::env::var(var)
                .with_context(|| format!("{var} is not set; export it to fetch from {self}"))?,
            None => String::new(),
        };

        let source: Box<dyn PriceSource> = match self {
            Self::Coingecko => {
                let mut source = CoinGecko::new(asset, vs_currency, api_key);
                if let Some(url) = base_url {
                    source = source.with_base_url(url);
                }
                Box::new(source)
            }
            Self::Taostats => {
                let mut source = Taostats::new(asset, api_key);
                if let Some(url) = base_url {
                    source = source.with_base_url(url);
                }
                Box::new(source)
            }
            Self::Coinmarketcap => {
                let mut source = CoinMarketCap::new(asset, vs_currency, api_key);
                if let Some(url) = base_url {
                    source = source.with_base_url(url);
                }
                Box::new(source)
            }
            Self::Binance => {
                let mut source = Binance::new(asset);
                if let Some(url) = base_url {
                    source = source.with_base_url(url);
                }
                Box::new(source)
            }
        };

        Ok(source)
    }
}

impl std::fmt::Display for SourceArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Coingecko => "coingecko",
            Self::Taostats => "taostats",
            Self::Coinmarketcap => "coinmarketcap",
            Self::Binance => "binance",
        };
        write!(f, "{name}")
    }
}

/// Formats an epoch-second timestamp as a UTC datetime for display.
pub(crate) fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0).map_or_else(
        || timestamp.to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}
