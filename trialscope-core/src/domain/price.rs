//! Price series and window types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daily closing prices for one ticker, ascending by date.
///
/// Sparse: weekends and trading holidays have no entry.
pub type DailyPriceSeries = BTreeMap<NaiveDate, f64>;

/// A resolved closing-price window around a trial start date.
///
/// Only the first and last observations participate in the percentage
/// change; the middle of the three is discarded by the acceptance rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceWindow {
    pub buy_date: NaiveDate,
    pub buy_price: f64,
    pub sell_date: NaiveDate,
    pub sell_price: f64,
}
