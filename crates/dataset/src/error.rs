use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open input file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read columnar data: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("Required column '{0}' is missing from the input table.")]
    MissingColumn(String),

    #[error("Column '{column}' has unsupported type {dtype}")]
    UnsupportedColumnType { column: String, dtype: String },

    #[error("Unknown time zone '{0}' on a datetime column")]
    UnknownTimeZone(String),

    #[error("Decoded table is inconsistent: {0}")]
    Inconsistent(#[from] core_types::CoreError),
}
