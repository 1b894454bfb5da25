use std::sync::Arc;

use arrow_array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use bytes::Bytes;
use parquet::arrow::arrow_writer::ArrowWriter;

/// Serialises the given batches into an in-memory Parquet file.
pub(crate) fn write_parquet(batches: &[RecordBatch]) -> Bytes {
    let schema = batches.first().expect("at least one batch").schema();
    let mut buffer = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).expect("writer");
        for batch in batches {
            writer.write(batch).expect("write");
        }
        writer.close().expect("close");
    }
    Bytes::from(buffer)
}

pub(crate) fn batch(columns: Vec<(&str, ArrayRef)>) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
        .collect();
    let schema = Arc::new(Schema::new(fields));
    RecordBatch::try_new(schema, columns.into_iter().map(|(_, array)| array).collect())
        .expect("batch")
}

pub(crate) fn floats(values: &[f64]) -> ArrayRef {
    Arc::new(Float64Array::from(values.to_vec()))
}

pub(crate) fn point_batch(ids: &[i64], latitudes: &[f64], longitudes: &[f64], severities: &[f64]) -> RecordBatch {
    batch(vec![
        ("id", Arc::new(Int64Array::from(ids.to_vec())) as ArrayRef),
        ("latitude", floats(latitudes)),
        ("longitude", floats(longitudes)),
        ("severity", floats(severities)),
    ])
}

pub(crate) fn zone_batch(regions: &[&str], risk: &[f64]) -> RecordBatch {
    let zeros = vec![0.0; regions.len()];
    batch(vec![
        ("accessibility", floats(&zeros)),
        ("risk", floats(risk)),
        ("bonus", floats(&zeros)),
        ("score", floats(&zeros)),
        ("region", Arc::new(StringArray::from(regions.to_vec())) as ArrayRef),
    ])
}

pub(crate) fn single_column(name: &str, data_type: DataType, array: ArrayRef) -> Bytes {
    let schema = Arc::new(Schema::new(vec![Field::new(name, data_type, true)]));
    let batch = RecordBatch::try_new(schema, vec![array]).expect("batch");
    write_parquet(&[batch])
}
