//! Benchmark support crate for the outreach planner.
//!
//! Provides seeded synthetic surveys and parameter types used by the
//! Criterion benchmarks for clustering, graph augmentation and routing.

pub mod error;
pub mod params;
pub mod source;
