use arrow_schema::{ArrowError, DataType};
use thiserror::Error;

/// Errors raised while reading a Parquet snapshot.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParquetProviderError {
    /// A required column is absent from the file.
    #[error("column `{column}` not found in Parquet schema")]
    ColumnNotFound {
        /// Name of the missing column.
        column: String,
    },
    /// A column has an unexpected Arrow type.
    #[error("column `{column}` must be {expected:?} but found {actual:?}")]
    InvalidColumnType {
        /// Name of the offending column.
        column: String,
        /// Type the provider reads.
        expected: DataType,
        /// Type found in the file.
        actual: DataType,
    },
    /// A required value is null.
    #[error("column `{column}` is null at row {row}")]
    NullValue {
        /// Name of the offending column.
        column: String,
        /// Absolute row index across batches.
        row: usize,
    },
    /// Arrow failed to decode a batch.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    /// The Parquet reader failed.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    /// The file could not be opened.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParquetProviderError {
    /// Stable machine-readable code for the variant.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound { .. } => "PARQUET_COLUMN_NOT_FOUND",
            Self::InvalidColumnType { .. } => "PARQUET_INVALID_COLUMN_TYPE",
            Self::NullValue { .. } => "PARQUET_NULL_VALUE",
            Self::Arrow(_) => "PARQUET_ARROW",
            Self::Parquet(_) => "PARQUET_READ",
            Self::Io(_) => "PARQUET_IO",
        }
    }
}
