//! # Charts
//!
//! Renders the five fixed PNG charts of the analysis from a `DatasetSummary`.
//!
//! Every chart is a deterministic function of one aggregate. The output
//! directory is created when missing and existing files are overwritten.

pub mod error;
pub mod palette;
pub mod renderer;

pub use error::ChartError;
pub use renderer::{ChartRenderer, ChartSize, CHART_FILES};
