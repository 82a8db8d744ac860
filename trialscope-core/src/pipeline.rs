//! Sequential backtest pipeline.
//!
//! One company at a time, one outstanding request at a time: query the
//! registry, fetch the ticker's full price history once, then date-filter
//! and resolve every trial. Every per-item failure is a skip, never an
//! abort; only resource-level errors (input list, report file) propagate.

use crate::companies::load_companies;
use crate::config::BacktestConfig;
use crate::dates::normalize_trial_date;
use crate::domain::{CompanyRecord, TrialRecord};
use crate::prices::PriceProvider;
use crate::registry::TrialRegistry;
use crate::report::{average_percent_change, write_report_csv, ResultRow};
use crate::resolver::{percent_change, resolve_window};
use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Why a trial produced no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The start date did not parse as a registry date.
    Undatable,
    /// The start date is after the as-of cutoff.
    NotStarted,
    /// No clean price window within the shift bound.
    NoWindow,
    /// Window found, but the percent basis was zero.
    ZeroBasis,
}

/// Per-run progress sink.
///
/// Every skip goes through here so a run is auditable from its output
/// alone; nothing is swallowed at the process level.
pub trait RunProgress {
    fn on_company_start(&self, company: &CompanyRecord, index: usize, total: usize);
    fn on_company_skipped(&self, company: &CompanyRecord, reason: &str);
    fn on_trial_skipped(&self, trial: &TrialRecord, reason: SkipReason);
    fn on_row(&self, row: &ResultRow, trial: &TrialRecord);
    fn on_excluded_from_average(&self, row: &ResultRow);
    fn on_finished(&self, summary: &RunSummary);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl RunProgress for StdoutProgress {
    fn on_company_start(&self, company: &CompanyRecord, index: usize, total: usize) {
        println!("[{}/{}] {} ({})", index + 1, total, company.name, company.ticker);
    }

    fn on_company_skipped(&self, company: &CompanyRecord, reason: &str) {
        println!("  SKIP {}: {reason}", company.ticker);
    }

    fn on_trial_skipped(&self, trial: &TrialRecord, reason: SkipReason) {
        // Future-dated trials are routine filtering; only surface failures.
        let reason = match reason {
            SkipReason::NotStarted => return,
            SkipReason::Undatable => "start date not parseable",
            SkipReason::NoWindow => "no clean price window",
            SkipReason::ZeroBasis => "zero price basis",
        };
        println!("  skip {}: {reason}", trial.nct_id);
    }

    fn on_row(&self, row: &ResultRow, trial: &TrialRecord) {
        println!(
            "{:20} | {:5} | {:11} | Posted: {:17} | Start: {} | Completion: {:17} | Buy: {:.2} | Sell: {:.2} | Diff: {:+.2}%",
            trial.company_name,
            row.ticker,
            row.nct_id,
            trial.first_posted,
            row.start_date,
            row.completion_date,
            row.buy_price,
            row.sell_price,
            row.percent_change
        );
    }

    fn on_excluded_from_average(&self, row: &ResultRow) {
        println!(
            "  excluded from average (non-numeric percent): {} {}",
            row.ticker, row.nct_id
        );
    }

    fn on_finished(&self, summary: &RunSummary) {
        println!(
            "\n{} rows from {} companies ({} skipped); {} trials skipped, {} not yet started",
            summary.rows.len(),
            summary.companies_processed,
            summary.companies_skipped,
            summary.trials_skipped,
            summary.trials_not_started
        );
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub rows: Vec<ResultRow>,
    pub average_percent: f64,
    pub companies_processed: usize,
    pub companies_skipped: usize,
    pub trials_not_started: usize,
    pub trials_skipped: usize,
}

/// Run the full pipeline and write the report.
///
/// Returns the accumulated rows and the aggregate average, which is also
/// the run's headline number for the CLI to print.
pub fn run_backtest(
    config: &BacktestConfig,
    registry: &dyn TrialRegistry,
    prices: &dyn PriceProvider,
    progress: &dyn RunProgress,
) -> Result<RunSummary> {
    let companies = load_companies(&config.company_list, &config.corporate_suffixes)
        .with_context(|| {
            format!(
                "failed to load company list {}",
                config.company_list.display()
            )
        })?;

    let as_of = config.as_of_date();
    let total = companies.len();

    let mut rows: Vec<ResultRow> = Vec::new();
    let mut companies_processed = 0usize;
    let mut companies_skipped = 0usize;
    let mut trials_not_started = 0usize;
    let mut trials_skipped = 0usize;

    for (index, company) in companies.iter().enumerate() {
        progress.on_company_start(company, index, total);

        let trials = match registry.query(company) {
            Ok(trials) => trials,
            Err(e) => {
                progress.on_company_skipped(company, &e.to_string());
                companies_skipped += 1;
                continue;
            }
        };

        // Date-filter before touching the price API so companies with no
        // started trials cost no price request.
        let mut dated: Vec<(TrialRecord, NaiveDate)> = Vec::new();
        for trial in trials {
            let Some(start) = normalize_trial_date(&trial.start_date) else {
                progress.on_trial_skipped(&trial, SkipReason::Undatable);
                trials_skipped += 1;
                continue;
            };
            if start > as_of {
                progress.on_trial_skipped(&trial, SkipReason::NotStarted);
                trials_not_started += 1;
                continue;
            }
            dated.push((trial, start));
        }

        if dated.is_empty() {
            companies_processed += 1;
            continue;
        }

        // One history fetch per company, shared by all of its trials.
        let history = match prices.daily_history(&company.ticker) {
            Ok(series) => series,
            Err(e) => {
                progress.on_company_skipped(company, &e.to_string());
                companies_skipped += 1;
                continue;
            }
        };

        for (trial, start) in dated {
            let Some(window) = resolve_window(&history, start, &config.window) else {
                progress.on_trial_skipped(&trial, SkipReason::NoWindow);
                trials_skipped += 1;
                continue;
            };
            let Some(percent) = percent_change(window.buy_price, window.sell_price) else {
                progress.on_trial_skipped(&trial, SkipReason::ZeroBasis);
                trials_skipped += 1;
                continue;
            };

            let row = ResultRow {
                ticker: trial.ticker.clone(),
                nct_id: trial.nct_id.clone(),
                start_date: start,
                completion_date: trial.completion_date.clone(),
                buy_price: window.buy_price,
                sell_price: window.sell_price,
                percent_change: percent,
            };
            progress.on_row(&row, &trial);
            rows.push(row);
        }

        companies_processed += 1;
    }

    write_report_csv(&config.output_path, &rows)?;

    let average_percent =
        average_percent_change(&rows, |row| progress.on_excluded_from_average(row));

    let summary = RunSummary {
        rows,
        average_percent,
        companies_processed,
        companies_skipped,
        trials_not_started,
        trials_skipped,
    };
    progress.on_finished(&summary);
    Ok(summary)
}
