//! Price history abstraction.

pub mod alphavantage;

pub use alphavantage::{AlphaVantageProvider, PriceConfig};

use crate::domain::DailyPriceSeries;
use thiserror::Error;

/// Structured errors from price-history fetches.
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by price provider")]
    RateLimited,

    #[error("no price data for symbol '{symbol}'")]
    NoData { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("missing API key: set `prices.api_key` or the {env} environment variable")]
    MissingApiKey { env: String },

    #[error("price error: {0}")]
    Other(String),
}

/// A source of daily closing-price history.
///
/// One call per ticker returns the maximum available history; the pipeline
/// reuses it across all of that company's trials.
pub trait PriceProvider {
    fn daily_history(&self, ticker: &str) -> Result<DailyPriceSeries, PriceError>;
}
