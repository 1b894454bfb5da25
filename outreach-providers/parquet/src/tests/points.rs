use std::sync::Arc;

use arrow_array::{ArrayRef, Float64Array, Int64Array};
use arrow_schema::DataType;
use rstest::rstest;

use outreach_core::{PointProvider, SeverityBracket};

use super::support::{batch, floats, point_batch, single_column, write_parquet};
use crate::{ParquetPointProvider, ParquetProviderError};

#[rstest]
fn loads_points_across_batches() {
    let bytes = write_parquet(&[
        point_batch(&[1, 2], &[0.0, 0.0], &[0.0, 0.01], &[6.0, 9.0]),
        point_batch(&[3], &[10.0], &[10.0], &[12.5]),
    ]);
    let provider = ParquetPointProvider::try_from_parquet_reader("survey", bytes).expect("valid file");

    assert_eq!(provider.name(), "survey");
    assert_eq!(provider.all_points().len(), 3);
    assert_eq!(provider.all_points()[2].id(), 3);
    assert_eq!(provider.all_points()[1].longitude(), 0.01);
}

#[rstest]
#[case(SeverityBracket::Severe, vec![1])]
#[case(SeverityBracket::Moderate, vec![2])]
#[case(SeverityBracket::Mild, vec![])]
#[case(SeverityBracket::Unaffected, vec![3])]
fn filters_by_bracket(#[case] bracket: SeverityBracket, #[case] expected: Vec<i64>) {
    let bytes = write_parquet(&[point_batch(
        &[1, 2, 3],
        &[0.0, 0.0, 0.0],
        &[0.0, 0.0, 0.0],
        &[6.0, 9.0, 12.5],
    )]);
    let provider = ParquetPointProvider::try_from_parquet_reader("survey", bytes).expect("valid file");
    let ids: Vec<i64> = provider
        .points(bracket)
        .expect("in-memory snapshot")
        .iter()
        .map(|point| point.id())
        .collect();
    assert_eq!(ids, expected);
}

#[rstest]
fn reports_missing_columns() {
    let bytes = write_parquet(&[batch(vec![
        ("id", Arc::new(Int64Array::from(vec![1])) as ArrayRef),
        ("latitude", floats(&[0.0])),
        ("longitude", floats(&[0.0])),
    ])]);
    let err = ParquetPointProvider::try_from_parquet_reader("survey", bytes)
        .expect_err("severity is missing");
    assert!(matches!(
        err,
        ParquetProviderError::ColumnNotFound { column } if column == "severity"
    ));
}

#[rstest]
fn reports_mistyped_columns() {
    let bytes = single_column(
        "id",
        DataType::Float64,
        Arc::new(Float64Array::from(vec![1.0])) as ArrayRef,
    );
    let err = ParquetPointProvider::try_from_parquet_reader("survey", bytes)
        .expect_err("id must be an integer");
    assert!(matches!(
        err,
        ParquetProviderError::InvalidColumnType { column, expected: DataType::Int64, .. } if column == "id"
    ));
    assert_eq!(
        ParquetProviderError::ColumnNotFound {
            column: "id".to_owned()
        }
        .code(),
        "PARQUET_COLUMN_NOT_FOUND"
    );
}

#[rstest]
fn reports_null_values_with_absolute_rows() {
    let first = point_batch(&[1], &[0.0], &[0.0], &[6.0]);
    let second = batch(vec![
        ("id", Arc::new(Int64Array::from(vec![2, 3])) as ArrayRef),
        ("latitude", floats(&[0.0, 0.0])),
        ("longitude", floats(&[0.0, 0.0])),
        (
            "severity",
            Arc::new(Float64Array::from(vec![Some(7.0), None])) as ArrayRef,
        ),
    ]);
    let bytes = write_parquet(&[first, second]);
    let err = ParquetPointProvider::try_from_parquet_reader("survey", bytes)
        .expect_err("null severity must be rejected");
    assert!(matches!(
        err,
        ParquetProviderError::NullValue { column, row: 2 } if column == "severity"
    ));
}

#[rstest]
fn missing_file_is_an_io_error() {
    let err = ParquetPointProvider::try_from_parquet_path("survey", "/nonexistent/points.parquet")
        .expect_err("file does not exist");
    assert!(matches!(err, ParquetProviderError::Io(_)));
    assert_eq!(err.code(), "PARQUET_IO");
}
