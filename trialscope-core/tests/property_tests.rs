//! Property tests for the window resolver and name cleanup.

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::BTreeMap;
use trialscope_core::companies::strip_corporate_suffixes;
use trialscope_core::config::default_corporate_suffixes;
use trialscope_core::domain::DailyPriceSeries;
use trialscope_core::resolver::{resolve_window, WindowParams};

fn series_from_offsets(offsets: &std::collections::BTreeSet<i64>) -> DailyPriceSeries {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    offsets
        .iter()
        .map(|&o| (base + Duration::days(o), 100.0 + o as f64))
        .collect()
}

proptest! {
    /// Any resolved window is the first clean span the forward search can
    /// reach: it holds exactly the required number of observations, its
    /// prices come from the series, and its shift is within the bound.
    #[test]
    fn resolved_windows_are_well_formed(
        offsets in proptest::collection::btree_set(0i64..40, 1..25),
        start_offset in 0i64..10,
    ) {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let series = series_from_offsets(&offsets);
        let start = base + Duration::days(start_offset);
        let params = WindowParams::default();

        if let Some(window) = resolve_window(&series, start, &params) {
            prop_assert!(window.buy_date >= start);
            prop_assert!(window.sell_date >= window.buy_date);
            prop_assert_eq!(series.get(&window.buy_date), Some(&window.buy_price));
            prop_assert_eq!(series.get(&window.sell_date), Some(&window.sell_price));

            // Some shift within the bound must produce exactly this window.
            let mut matched = false;
            for shift in 0..=params.max_shifts {
                let lo = start + Duration::days(shift as i64);
                let hi = lo + Duration::days(params.span_days);
                let obs: Vec<(&NaiveDate, &f64)> = series.range(lo..=hi).collect();
                if obs.len() == params.required_observations
                    && *obs[0].0 == window.buy_date
                    && *obs[obs.len() - 1].0 == window.sell_date
                {
                    matched = true;
                    break;
                }
            }
            prop_assert!(matched, "window not reachable within the shift bound");
        } else {
            // Failure means no shift in bound ever saw a clean span.
            for shift in 0..=params.max_shifts {
                let lo = start + Duration::days(shift as i64);
                let hi = lo + Duration::days(params.span_days);
                let count = series.range(lo..=hi).count();
                prop_assert_ne!(count, params.required_observations);
            }
        }
    }

    /// Stripping is idempotent: a cleaned name cleans to itself.
    #[test]
    fn suffix_stripping_is_idempotent(name in "[A-Za-z][A-Za-z. ]{0,40}") {
        let suffixes = default_corporate_suffixes();
        let once = strip_corporate_suffixes(&name, &suffixes);
        let twice = strip_corporate_suffixes(&once, &suffixes);
        prop_assert_eq!(once, twice);
    }

    /// The cleaned name never ends in a suffix token.
    #[test]
    fn cleaned_names_have_no_trailing_suffix(name in "[A-Za-z][A-Za-z. ]{0,40}") {
        let suffixes = default_corporate_suffixes();
        let cleaned = strip_corporate_suffixes(&name, &suffixes);
        if let Some(last) = cleaned.split_whitespace().last() {
            prop_assert!(!suffixes.iter().any(|s| s.eq_ignore_ascii_case(last)));
        }
    }
}

/// Sanity anchor on a realistic calendar: a weekday-only series resolves
/// for any start date, because some shifted span always straddles exactly
/// one weekend. A four-day span inside a trading week holds four prices
/// and gets shifted past.
#[test]
fn weekday_series_resolves_for_any_start() {
    // 2024-01-01 is a Monday; six weeks of weekdays.
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let series: BTreeMap<NaiveDate, f64> = (0..42)
        .map(|o| base + Duration::days(o))
        .filter(|d| d.weekday().num_days_from_monday() < 5)
        .map(|d| (d, 100.0))
        .collect();
    let params = WindowParams::default();

    for day in 0..21 {
        let start = base + Duration::days(day);
        let window = resolve_window(&series, start, &params);
        assert!(window.is_some(), "no window for start offset {day}");
    }
}
