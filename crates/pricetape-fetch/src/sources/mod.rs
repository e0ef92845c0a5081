//! Upstream source implementations.

mod binance;
mod coingecko;
mod coinmarketcap;
mod taostats;

pub use binance::Binance;
pub use coingecko::CoinGecko;
pub use coinmarketcap::CoinMarketCap;
pub use taostats::Taostats;
