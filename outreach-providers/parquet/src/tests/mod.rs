//! Tests covering Parquet ingestion of points and zones.

mod points;
mod support;
