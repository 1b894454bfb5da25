//! Parquet-backed point and zone providers for the outreach planner.
//!
//! Both providers read their snapshot eagerly on construction and then serve
//! it from memory, so the planner's own operations never touch the disk.

mod columns;
mod errors;
mod points;
mod wkt;
mod zones;

pub use errors::ParquetProviderError;
pub use points::ParquetPointProvider;
pub use wkt::parse_wkt_polygon;
pub use zones::ParquetZoneProvider;

#[cfg(test)]
mod tests;
