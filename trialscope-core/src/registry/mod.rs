//! Trial registry abstraction.
//!
//! All registry-specific request and response shaping lives behind the
//! `TrialRegistry` trait. The classic ClinicalTrials.gov endpoint is
//! scheduled for retirement, so swapping the implementation must not touch
//! the resolver or the report.

pub mod ctgov;

pub use ctgov::{ClassicCtgovRegistry, RegistryConfig};

use crate::domain::{CompanyRecord, TrialRecord};
use thiserror::Error;

/// Structured errors from registry queries.
///
/// Any of these causes the pipeline to skip the company; none of them
/// aborts the run.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("registry returned HTTP {status} for '{expression}'")]
    Status { status: u16, expression: String },

    #[error("rate limited by registry")]
    RateLimited,

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("registry error: {0}")]
    Other(String),
}

/// A queryable clinical-trials registry.
pub trait TrialRegistry {
    /// Fetch all trials matching a company's cleaned name.
    fn query(&self, company: &CompanyRecord) -> Result<Vec<TrialRecord>, RegistryError>;
}
