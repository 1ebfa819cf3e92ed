//! # Analytics Engine
//!
//! Joins transactions with the day's exchange rates, normalizes every amount
//! to USD and computes the statistics the charts and the report are built from.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** this crate has no knowledge of files, dataframes or
//!   rendering. It depends only on `core-types`.
//! - **Stateless calculation:** `merge` is a pure function of its two tables
//!   and `AnalyticsEngine::summarize` is a pure function of the merged rows.
//!   Running them twice on the same input gives identical output.
//!
//! ## Public API
//!
//! - `normalize_amount` / `merge`: the drop-on-missing-rate currency conversion.
//! - `AnalyticsEngine`: the aggregate calculator.
//! - `DatasetSummary`: every scalar and grouped aggregate of one run.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod correlation;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod normalizer;
pub mod summary;

// Re-export the key components to create a clean, public-facing API.
pub use correlation::CorrelationMatrix;
pub use distribution::Histogram;
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use normalizer::{merge, normalize_amount, Normalized};
pub use summary::{CategoryFraudRate, DatasetSummary, HourCount, RankedCount};
