//! Domain types shared across the pipeline.

pub mod company;
pub mod price;
pub mod trial;

pub use company::CompanyRecord;
pub use price::{DailyPriceSeries, PriceWindow};
pub use trial::TrialRecord;
