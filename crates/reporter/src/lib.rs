//! # Reporter
//!
//! Writes the plain-text analysis report: the headline statistics followed by
//! two fixed lists of hypotheses. The output contains no timestamps or other
//! run-dependent data, so identical inputs give byte-identical reports.

pub mod error;
pub mod hypotheses;
pub mod report;

pub use error::ReportError;
pub use hypotheses::{PRODUCT_HYPOTHESES, TECHNICAL_HYPOTHESES};
pub use report::{ReportStats, TextReport};
