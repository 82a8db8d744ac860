//! Registry date normalization.
//!
//! ClinicalTrials.gov formats dates as "July 01, 2023", or "July 2023" for
//! studies recorded with month precision only. Anything else means the
//! trial cannot be dated; callers skip it rather than crash.

use chrono::NaiveDate;

/// Parse a registry date string into a calendar date.
///
/// Month-precision dates resolve to the first of the month. Returns `None`
/// for any other shape, including empty strings.
pub fn normalize_trial_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%B %d, %Y") {
        return Some(date);
    }

    // Month-year only: the day defaults to 01.
    NaiveDate::parse_from_str(&format!("{raw} 01"), "%B %Y %d").ok()
}
