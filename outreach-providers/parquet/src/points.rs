//! Patient records read from a Parquet snapshot.
use std::{fs::File, path::Path};

use arrow_array::{Float64Array, Int64Array, RecordBatch};
use arrow_schema::DataType;
use parquet::file::reader::ChunkReader;
use tracing::{debug, instrument};

use outreach_core::{Point, PointProvider, SeverityBracket};

use crate::columns::{ColumnSpec, read_columns, required};
use crate::errors::ParquetProviderError;

const ID: ColumnSpec = ("id", DataType::Int64);
const LATITUDE: ColumnSpec = ("latitude", DataType::Float64);
const LONGITUDE: ColumnSpec = ("longitude", DataType::Float64);
const SEVERITY: ColumnSpec = ("severity", DataType::Float64);

/// Point provider over the `id`, `latitude`, `longitude` and `severity`
/// columns of a Parquet file.
#[derive(Debug, Clone)]
pub struct ParquetPointProvider {
    name: String,
    points: Vec<Point>,
}

impl ParquetPointProvider {
    /// Loads every record from the Parquet file at `path`.
    ///
    /// # Errors
    /// Returns [`ParquetProviderError`] when the file cannot be read, a
    /// column is missing or mistyped, or a value is null.
    pub fn try_from_parquet_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, ParquetProviderError> {
        let file = File::open(path)?;
        Self::try_from_parquet_reader(name, file)
    }

    /// Loads every record from a Parquet reader.
    ///
    /// # Errors
    /// Returns [`ParquetProviderError`] when decoding fails, a column is
    /// missing or mistyped, or a value is null.
    #[instrument(name = "providers.parquet.points", skip(name, reader))]
    pub fn try_from_parquet_reader<R>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, ParquetProviderError>
    where
        R: ChunkReader + Send + 'static,
    {
        let batches = read_columns(reader, &[ID, LATITUDE, LONGITUDE, SEVERITY])?;
        let points = points_from_batches(&batches)?;
        debug!(points = points.len(), "loaded point snapshot");
        Ok(Self {
            name: name.into(),
            points,
        })
    }

    /// Every record in file order, regardless of bracket.
    #[must_use]
    #[rustfmt::skip]
    pub fn all_points(&self) -> &[Point] { &self.points }
}

fn points_from_batches(batches: &[RecordBatch]) -> Result<Vec<Point>, ParquetProviderError> {
    let mut points = Vec::with_capacity(batches.iter().map(RecordBatch::num_rows).sum());
    for batch in batches {
        let start_row = points.len();
        let ids = required::<Int64Array>(batch, &ID, start_row)?;
        let latitudes = required::<Float64Array>(batch, &LATITUDE, start_row)?;
        let longitudes = required::<Float64Array>(batch, &LONGITUDE, start_row)?;
        let severities = required::<Float64Array>(batch, &SEVERITY, start_row)?;
        for row in 0..batch.num_rows() {
            points.push(Point::new(
                ids.value(row),
                latitudes.value(row),
                longitudes.value(row),
                severities.value(row),
            ));
        }
    }
    Ok(points)
}

impl PointProvider for ParquetPointProvider {
    type Error = ParquetProviderError;

    fn name(&self) -> &str {
        &self.name
    }

    fn points(&self, bracket: SeverityBracket) -> Result<Vec<Point>, Self::Error> {
        Ok(bracket.filter(&self.points))
    }
}
