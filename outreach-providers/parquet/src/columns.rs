//! Column projection and typed access shared by both providers.
use arrow_array::{Array, RecordBatch, RecordBatchReader};
use arrow_schema::{ArrowError, DataType};
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::file::reader::ChunkReader;

use crate::errors::ParquetProviderError;

/// A required column and the Arrow type the provider reads it as.
pub(crate) type ColumnSpec = (&'static str, DataType);

/// Reads the listed columns, checking presence and type against the file
/// schema before any batch is decoded.
pub(crate) fn read_columns<R>(
    reader: R,
    columns: &[ColumnSpec],
) -> Result<Vec<RecordBatch>, ParquetProviderError>
where
    R: ChunkReader + Send + 'static,
{
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
    let mask = ProjectionMask::columns(
        builder.parquet_schema(),
        columns.iter().map(|(name, _)| *name),
    );
    let reader = builder.with_projection(mask).build()?;

    let schema = reader.schema();
    for (name, expected) in columns {
        let index = schema
            .index_of(name)
            .map_err(|_| ParquetProviderError::ColumnNotFound {
                column: (*name).to_owned(),
            })?;
        let actual = schema.field(index).data_type();
        if actual != expected {
            return Err(ParquetProviderError::InvalidColumnType {
                column: (*name).to_owned(),
                expected: expected.clone(),
                actual: actual.clone(),
            });
        }
    }

    Ok(reader.collect::<Result<Vec<_>, ArrowError>>()?)
}

/// Downcasts a column of `batch` and rejects nulls, reporting absolute rows.
pub(crate) fn required<'a, A>(
    batch: &'a RecordBatch,
    spec: &ColumnSpec,
    start_row: usize,
) -> Result<&'a A, ParquetProviderError>
where
    A: Array + 'static,
{
    let (name, expected) = spec;
    let array = batch
        .column_by_name(name)
        .ok_or_else(|| ParquetProviderError::ColumnNotFound {
            column: (*name).to_owned(),
        })?;
    let typed = array.as_any().downcast_ref::<A>().ok_or_else(|| {
        ParquetProviderError::InvalidColumnType {
            column: (*name).to_owned(),
            expected: expected.clone(),
            actual: array.data_type().clone(),
        }
    })?;
    if let Some(offset) = (0..typed.len()).find(|&row| typed.is_null(row)) {
        return Err(ParquetProviderError::NullValue {
            column: (*name).to_owned(),
            row: start_row + offset,
        });
    }
    Ok(typed)
}
