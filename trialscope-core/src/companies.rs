//! Company list loading and name cleanup.
//!
//! The input universe is a CSV of listed companies (exchange screener
//! layout): column 1 is the company name, column 2 the ticker. Corporate
//! suffixes are stripped from the tail of the name so it works as a
//! registry search expression — "Incannex Healthcare Inc." finds nothing,
//! "Incannex Healthcare" does.

use crate::domain::CompanyRecord;
use std::path::Path;
use thiserror::Error;

/// Errors from reading the company list.
#[derive(Debug, Error)]
pub enum CompanyListError {
    #[error("failed to read company list {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Load (name, ticker) pairs from a company list CSV.
///
/// The header row is skipped. Rows with fewer than three columns, or with
/// an empty name or ticker after cleanup, are ignored rather than failing
/// the whole list.
pub fn load_companies(
    path: &Path,
    suffixes: &[String],
) -> Result<Vec<CompanyRecord>, CompanyListError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| CompanyListError::Read {
            path: path.display().to_string(),
            source: e,
        })?;

    let mut companies = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CompanyListError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        if record.len() < 3 {
            continue;
        }

        let name = strip_corporate_suffixes(&record[1], suffixes);
        let ticker = record[2].trim().to_string();
        if name.is_empty() || ticker.is_empty() {
            continue;
        }

        companies.push(CompanyRecord { name, ticker });
    }

    Ok(companies)
}

/// Remove corporate-suffix tokens from the tail of a company name.
///
/// Tokens are matched case-insensitively and stripped iteratively, so
/// "Acme Group Holdings" loses both "Holdings" and "Group". Matching
/// tokens elsewhere in the name are left alone.
pub fn strip_corporate_suffixes(raw: &str, suffixes: &[String]) -> String {
    let mut tokens: Vec<&str> = raw.split_whitespace().collect();
    while let Some(last) = tokens.last() {
        if suffixes.iter().any(|s| s.eq_ignore_ascii_case(last)) {
            tokens.pop();
        } else {
            break;
        }
    }
    tokens.join(" ")
}
