use crate::error::DatasetError;
use crate::tables::{decode_exchange_rates, decode_transactions};
use core_types::{ExchangeRates, TransactionTable};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Reads a whole parquet file into memory.
///
/// No schema validation happens here beyond what the format itself guarantees.
pub fn load_frame(path: &Path) -> Result<DataFrame, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let df = ParquetReader::new(file).finish()?;
    tracing::debug!(path = %path.display(), shape = ?df.shape(), "Loaded parquet file.");
    Ok(df)
}

/// Loads and decodes the transaction table.
pub fn load_transactions(path: &Path) -> Result<TransactionTable, DatasetError> {
    let df = load_frame(path)?;
    decode_transactions(&df)
}

/// Loads and decodes the historical exchange-rate table.
pub fn load_exchange_rates(path: &Path) -> Result<ExchangeRates, DatasetError> {
    let df = load_frame(path)?;
    decode_exchange_rates(&df)
}
