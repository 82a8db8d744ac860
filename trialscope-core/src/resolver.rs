//! Price-window resolution and the percentage-change rule.
//!
//! Trading calendars have gaps, so the resolver searches forward from the
//! trial start date for a span holding exactly the required number of
//! closing prices. Searching forward rather than backward avoids anchoring
//! on stale pre-trial data, and the shift bound keeps the worst case to
//! about two trading weeks.

use crate::domain::{DailyPriceSeries, PriceWindow};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Tolerances for the forward window search.
///
/// The defaults reproduce the observed behavior: a three-calendar-day span,
/// accepted only when it holds exactly three observations, shifted forward
/// at most ten times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowParams {
    /// Calendar days between the tentative buy and sell dates.
    pub span_days: i64,
    /// Number of closing prices a span must contain to be accepted.
    pub required_observations: usize,
    /// Forward one-day shifts attempted before giving up.
    pub max_shifts: u32,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            span_days: 3,
            required_observations: 3,
            max_shifts: 10,
        }
    }
}

/// Locate a closing-price window anchored at or after `start_date`.
///
/// The span `[start, start + span_days]` is accepted when it contains
/// exactly `required_observations` prices; otherwise both bounds shift
/// forward one calendar day and the search repeats. Returns `None` once
/// the shift bound is exhausted; the caller skips the trial.
pub fn resolve_window(
    series: &DailyPriceSeries,
    start_date: NaiveDate,
    params: &WindowParams,
) -> Option<PriceWindow> {
    if series.is_empty() || params.required_observations == 0 {
        return None;
    }

    for shift in 0..=params.max_shifts {
        let buy_date = start_date + Duration::days(shift as i64);
        let sell_date = buy_date + Duration::days(params.span_days);

        let observations: Vec<(&NaiveDate, &f64)> = series.range(buy_date..=sell_date).collect();

        if observations.len() == params.required_observations {
            let (first_date, first_price) = observations[0];
            let (last_date, last_price) = observations[observations.len() - 1];
            return Some(PriceWindow {
                buy_date: *first_date,
                buy_price: *first_price,
                sell_date: *last_date,
                sell_price: *last_price,
            });
        }
    }

    None
}

/// Percentage change between the window's buy and sell prices.
///
/// The denominator reproduces the original metric — the price sum, divided
/// by two again — not the usual return basis. Downstream aggregates depend
/// on this exact formula; see DESIGN.md before changing it.
///
/// Returns `None` when `buy + sell` is zero, which would otherwise divide
/// by zero.
pub fn percent_change(buy: f64, sell: f64) -> Option<f64> {
    let basis = buy + sell;
    if basis == 0.0 {
        return None;
    }
    Some((sell - buy) / basis / 2.0 * 100.0)
}
