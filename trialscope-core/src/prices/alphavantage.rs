//! Alpha Vantage TIME_SERIES_DAILY provider.
//!
//! The free tier is tightly rate limited (25 requests per day), which is
//! the binding constraint on universe size. Soft failures arrive as HTTP
//! 200 bodies carrying a "Note"/"Information" key (throttled) or an
//! "Error Message" key (unknown symbol) instead of the time series.

use super::{PriceError, PriceProvider};
use crate::domain::DailyPriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

const API_KEY_ENV: &str = "ALPHA_VANTAGE";
const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Price provider settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    /// Alpha Vantage API key. Falls back to the ALPHA_VANTAGE environment
    /// variable when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Daily time-series response. Only the close is consumed.
#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<HashMap<String, DailyQuote>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyQuote {
    #[serde(rename = "4. close")]
    close: String,
}

/// Blocking Alpha Vantage client, with bounded retry.
pub struct AlphaVantageProvider {
    client: reqwest::blocking::Client,
    api_key: String,
    max_retries: u32,
    base_delay: Duration,
}

impl AlphaVantageProvider {
    /// Build a provider, resolving the API key from config or environment.
    pub fn new(config: &PriceConfig) -> Result<Self, PriceError> {
        let api_key = match &config.api_key {
            Some(key) => key.clone(),
            None => std::env::var(API_KEY_ENV).map_err(|_| PriceError::MissingApiKey {
                env: API_KEY_ENV.into(),
            })?,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("trialscope/0.1")
            .build()
            .expect("failed to build HTTP client");

        Ok(Self {
            client,
            api_key,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Turn a wire response into an ordered closing-price series.
    fn parse_response(symbol: &str, resp: DailyResponse) -> Result<DailyPriceSeries, PriceError> {
        // Throttle notes come back as 200s with no series attached.
        if resp.note.is_some() || resp.information.is_some() {
            return Err(PriceError::RateLimited);
        }
        if resp.error_message.is_some() {
            return Err(PriceError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let series = resp.series.ok_or_else(|| {
            PriceError::ResponseFormat(format!("no daily time series for {symbol}"))
        })?;

        let mut daily = DailyPriceSeries::new();
        for (date_str, quote) in &series {
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
                PriceError::ResponseFormat(format!("invalid date key '{date_str}' for {symbol}"))
            })?;
            let close: f64 = quote.close.parse().map_err(|_| {
                PriceError::ResponseFormat(format!(
                    "unparseable close '{}' on {date} for {symbol}",
                    quote.close
                ))
            })?;
            daily.insert(date, close);
        }

        if daily.is_empty() {
            return Err(PriceError::NoData {
                symbol: symbol.to_string(),
            });
        }

        Ok(daily)
    }

    /// Execute the fetch with retry and exponential backoff.
    fn fetch_with_retry(&self, symbol: &str) -> Result<DailyPriceSeries, PriceError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                std::thread::sleep(delay);
            }

            let request = self.client.get(BASE_URL).query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "full"),
                ("apikey", self.api_key.as_str()),
            ]);

            match request.send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                        || status.is_server_error()
                    {
                        last_error = Some(PriceError::RateLimited);
                        continue;
                    }

                    if !status.is_success() {
                        return Err(PriceError::Other(format!("HTTP {status} for {symbol}")));
                    }

                    let body: DailyResponse = resp.json().map_err(|e| {
                        PriceError::ResponseFormat(format!(
                            "failed to parse daily series for {symbol}: {e}"
                        ))
                    })?;

                    match Self::parse_response(symbol, body) {
                        // A throttle note in a 200 body retries like a 429.
                        Err(PriceError::RateLimited) => {
                            last_error = Some(PriceError::RateLimited);
                            continue;
                        }
                        other => return other,
                    }
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(PriceError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(PriceError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| PriceError::Other("max retries exceeded".into())))
    }
}

impl PriceProvider for AlphaVantageProvider {
    fn daily_history(&self, ticker: &str) -> Result<DailyPriceSeries, PriceError> {
        self.fetch_with_retry(ticker)
    }
}
