//! Health-system zones read from a Parquet snapshot with WKT regions.
use std::{fs::File, path::Path};

use arrow_array::{Float64Array, RecordBatch, StringArray};
use arrow_schema::DataType;
use parquet::file::reader::ChunkReader;
use tracing::{debug, instrument, warn};

use outreach_core::{ZoneAttributes, ZoneProvider, ZoneRecord};

use crate::columns::{ColumnSpec, read_columns, required};
use crate::errors::ParquetProviderError;
use crate::wkt::parse_wkt_polygon;

const ACCESSIBILITY: ColumnSpec = ("accessibility", DataType::Float64);
const RISK: ColumnSpec = ("risk", DataType::Float64);
const BONUS: ColumnSpec = ("bonus", DataType::Float64);
const SCORE: ColumnSpec = ("score", DataType::Float64);
const REGION: ColumnSpec = ("region", DataType::Utf8);

/// Zone provider over the attribute columns and WKT `region` column of a
/// Parquet file.
///
/// Rows whose region is not a readable polygon are skipped with a warning.
#[derive(Debug, Clone)]
pub struct ParquetZoneProvider {
    name: String,
    records: Vec<ZoneRecord>,
    skipped: usize,
}

impl ParquetZoneProvider {
    /// Loads every zone from the Parquet file at `path`.
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

    /// Loads every zone from a Parquet reader.
    ///
    /// # Errors
    /// Returns [`ParquetProviderError`] when decoding fails, a column is
    /// missing or mistyped, or a value is null.
    #[instrument(name = "providers.parquet.zones", skip(name, reader))]
    pub fn try_from_parquet_reader<R>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, ParquetProviderError>
    where
        R: ChunkReader + Send + 'static,
    {
        let batches = read_columns(reader, &[ACCESSIBILITY, RISK, BONUS, SCORE, REGION])?;
        let (records, skipped) = records_from_batches(&batches)?;
        debug!(zones = records.len(), skipped, "loaded zone snapshot");
        Ok(Self {
            name: name.into(),
            records,
            skipped,
        })
    }

    /// Number of rows dropped because their region could not be parsed.
    #[must_use]
    #[rustfmt::skip]
    pub fn skipped(&self) -> usize { self.skipped }
}

fn records_from_batches(
    batches: &[RecordBatch],
) -> Result<(Vec<ZoneRecord>, usize), ParquetProviderError> {
    let mut records = Vec::new();
    let mut row = 0_usize;
    let mut skipped = 0_usize;
    for batch in batches {
        let accessibility = required::<Float64Array>(batch, &ACCESSIBILITY, row)?;
        let risk = required::<Float64Array>(batch, &RISK, row)?;
        let bonus = required::<Float64Array>(batch, &BONUS, row)?;
        let score = required::<Float64Array>(batch, &SCORE, row)?;
        let region = required::<StringArray>(batch, &REGION, row)?;
        for index in 0..batch.num_rows() {
            let Some(vertices) = parse_wkt_polygon(region.value(index)) else {
                warn!(row = row + index, "skipping zone with unreadable region");
                skipped += 1;
                continue;
            };
            records.push(ZoneRecord {
                attributes: ZoneAttributes::new(
                    accessibility.value(index),
                    risk.value(index),
                    bonus.value(index),
                    score.value(index),
                ),
                vertices,
            });
        }
        row += batch.num_rows();
    }
    Ok((records, skipped))
}

impl ZoneProvider for ParquetZoneProvider {
    type Error = ParquetProviderError;

    fn name(&self) -> &str {
        &self.name
    }

    fn zones(&self) -> Result<Vec<ZoneRecord>, Self::Error> {
        Ok(self.records.clone())
    }
}
