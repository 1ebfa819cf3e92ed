//! # Dataset Crate
//!
//! The storage adapter of the analysis. It reads the two parquet inputs into
//! polars `DataFrame`s and decodes them into the typed tables of `core-types`.
//!
//! ## Architectural Principles
//!
//! - **Adapter only:** everything polars-specific stays in here. The analytics
//!   crate works on plain Rust records and never sees a `DataFrame`.
//! - **Lenient decoding:** column types are accepted the way a dataframe
//!   library would coerce them (strings or native temporals for timestamps,
//!   any dtype for identifiers). Values that cannot be decoded become nulls,
//!   never errors. Only a missing column or an unusable dtype is fatal.
//!
//! ## Public API
//!
//! - `load_frame`: reads one parquet file.
//! - `load_transactions` / `load_exchange_rates`: read and decode in one step.
//! - `decode_transactions` / `decode_exchange_rates`: decode an in-memory frame.
//! - `DatasetError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod columns;
pub mod error;
pub mod loader;
pub mod tables;

// Re-export the key components to create a clean, public-facing API.
pub use error::DatasetError;
pub use loader::{load_exchange_rates, load_frame, load_transactions};
pub use tables::{decode_exchange_rates, decode_transactions};

/// Column names the transaction table must provide.
pub mod schema {
    pub const TIMESTAMP: &str = "timestamp";
    pub const CURRENCY: &str = "currency";
    pub const AMOUNT: &str = "amount";
    pub const CUSTOMER_ID: &str = "customer_id";
    pub const VENDOR: &str = "vendor";
    pub const VENDOR_CATEGORY: &str = "vendor_category";
    pub const COUNTRY: &str = "country";
    pub const IS_FRAUD: &str = "is_fraud";

    /// Date column of the exchange-rate table.
    pub const DATE: &str = "date";
}
