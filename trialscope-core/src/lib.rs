//! TrialScope Core — clinical-trial catalyst backtest pipeline.
//!
//! Tests a simple hypothesis: when a publicly listed company's clinical
//! trial starts, does its stock price move predictably over the following
//! days? The crate wires four stages in strict sequence:
//! - Company list loading with corporate-suffix cleanup
//! - Trial registry queries (classic ClinicalTrials.gov study_fields API)
//! - Daily closing-price history (Alpha Vantage)
//! - Price-window resolution, the CSV report, and its aggregate average
//!
//! Both upstream services sit behind traits (`TrialRegistry`,
//! `PriceProvider`) so implementations can be swapped or faked in tests
//! without touching the resolver or the report.

pub mod companies;
pub mod config;
pub mod dates;
pub mod domain;
pub mod pipeline;
pub mod prices;
pub mod registry;
pub mod report;
pub mod resolver;
