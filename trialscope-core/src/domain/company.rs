//! Listed-company records from the input universe.

use serde::{Deserialize, Serialize};

/// A publicly listed company: cleaned search name plus ticker symbol.
///
/// The name has had trailing corporate-suffix tokens ("Inc.", "Ltd.", ...)
/// removed so it can be used directly as a registry search expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    pub ticker: String,
}
