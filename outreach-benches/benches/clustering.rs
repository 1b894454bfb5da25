//! Radius clustering benchmarks.
//!
//! Measures `compute_clusters` over seeded surveys of increasing size at the
//! default radius and at a wider one that merges more hotspots.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use outreach_benches::{
    error::BenchSetupError,
    params::ClusteringBenchParams,
    source::{SurveyConfig, synthetic_survey},
};
use outreach_core::{DEFAULT_RADIUS_KM, compute_clusters};

/// Seed used for all synthetic data generation in this benchmark.
const SEED: u64 = 42;

/// Survey sizes to benchmark.
const POINT_COUNTS: &[usize] = &[1_000, 5_000, 10_000];

/// Radii to benchmark, in kilometres.
const RADII_KM: &[f64] = &[DEFAULT_RADIUS_KM, 20.0];

fn clustering_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("compute_clusters");
    group.sample_size(20);

    for &point_count in POINT_COUNTS {
        let points = synthetic_survey(&SurveyConfig {
            point_count,
            hotspot_count: point_count / 50,
            spread_deg: 0.1,
            seed: SEED,
        })?;

        for &radius_km in RADII_KM {
            let params = ClusteringBenchParams {
                point_count,
                radius_km,
            };
            group.bench_with_input(
                BenchmarkId::from_parameter(&params),
                &points,
                |b, survey| {
                    b.iter(|| compute_clusters(survey, radius_km));
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn clustering(c: &mut Criterion) {
    if let Err(err) = clustering_impl(c) {
        panic!("clustering benchmark setup failed: {err}");
    }
}

criterion_group!(benches, clustering);
criterion_main!(benches);
