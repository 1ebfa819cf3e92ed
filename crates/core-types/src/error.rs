use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Column '{column}' has {actual} values but the table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate currency column: {0}")]
    DuplicateCurrency(String),
}
