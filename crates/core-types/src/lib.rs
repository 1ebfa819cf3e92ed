//! # Core Types
//!
//! The plain data shared by every stage of the analysis: transactions as read
//! from storage, the daily exchange-rate table, and the merged records that
//! survive currency normalization.
//!
//! This crate has no knowledge of file formats, dataframes or rendering.

pub mod error;
pub mod records;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use records::{
    ExchangeRates, FeatureColumn, MergedRecord, RateRow, Transaction, TransactionTable,
};
