//! Result rows, CSV report output, and the aggregate average.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// One successfully resolved trial — the report's unit of output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub ticker: String,
    pub nct_id: String,
    /// Normalized trial start date.
    pub start_date: NaiveDate,
    /// Completion date as the registry reported it (may be unparseable).
    pub completion_date: String,
    pub buy_price: f64,
    pub sell_price: f64,
    pub percent_change: f64,
}

/// Write the report CSV, creating parent directories as needed.
///
/// Prices and the percentage are formatted to two decimal places.
pub fn write_report_csv(path: &Path, rows: &[ResultRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create report directory {}", parent.display())
            })?;
        }
    }

    let mut file = File::create(path)
        .with_context(|| format!("failed to create report {}", path.display()))?;

    writeln!(
        file,
        "Ticker, NCTId, StartDate, CompletionDate, BuyPrice, SellPrice, PercentDiff"
    )?;

    for row in rows {
        writeln!(
            file,
            "{}, {}, {}, {}, {:.2}, {:.2}, {:.2}",
            row.ticker,
            row.nct_id,
            row.start_date,
            row.completion_date,
            row.buy_price,
            row.sell_price,
            row.percent_change
        )?;
    }

    Ok(())
}

/// Arithmetic mean of `percent_change` across all rows.
///
/// Zero rows yield 0.0. Non-finite values are excluded from both the sum
/// and the count — reported through `on_excluded`, never counted as zero.
pub fn average_percent_change(rows: &[ResultRow], mut on_excluded: impl FnMut(&ResultRow)) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;

    for row in rows {
        if row.percent_change.is_finite() {
            sum += row.percent_change;
            count += 1;
        } else {
            on_excluded(row);
        }
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(percent: f64) -> ResultRow {
        ResultRow {
            ticker: "IXHL".into(),
            nct_id: "NCT05978193".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
            completion_date: "December 2025".into(),
            buy_price: 10.0,
            sell_price: 12.0,
            percent_change: percent,
        }
    }

    #[test]
    fn average_over_rows() {
        let rows = vec![row(10.0), row(-5.0), row(15.0)];
        let avg = average_percent_change(&rows, |_| {});
        assert!((avg - 6.666666666666667).abs() < 1e-12, "got {avg}");
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(average_percent_change(&[], |_| {}), 0.0);
    }

    #[test]
    fn non_finite_rows_are_excluded_not_zeroed() {
        let rows = vec![row(10.0), row(f64::NAN), row(20.0)];
        let mut excluded = 0;
        let avg = average_percent_change(&rows, |_| excluded += 1);

        assert_eq!(excluded, 1);
        assert!((avg - 15.0).abs() < 1e-12, "got {avg}");
    }

    #[test]
    fn csv_has_the_exact_header_and_two_decimal_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results").join("output.csv");

        write_report_csv(&path, &[row(4.545454545454546)]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines[0],
            "Ticker, NCTId, StartDate, CompletionDate, BuyPrice, SellPrice, PercentDiff"
        );
        assert_eq!(
            lines[1],
            "IXHL, NCT05978193, 2024-02-14, December 2025, 10.00, 12.00, 4.55"
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn empty_report_still_writes_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");

        write_report_csv(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
