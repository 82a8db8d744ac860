//! Trial records as returned by the registry.

use serde::{Deserialize, Serialize};

/// One clinical trial returned by a registry query for a company.
///
/// Dates stay in the registry's textual format ("July 01, 2023"); they are
/// normalized at filter time so undatable trials can be skipped without
/// losing the raw value for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub nct_id: String,
    pub status: String,
    pub first_posted: String,
    pub start_date: String,
    pub completion_date: String,
    pub company_name: String,
    pub ticker: String,
}
