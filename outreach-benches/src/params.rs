//! Benchmark parameter types, rendered as Criterion benchmark ids.

use std::fmt;

/// Parameters for a clustering benchmark run.
#[derive(Clone, Debug)]
pub struct ClusteringBenchParams {
    /// Number of points in the survey.
    pub point_count: usize,
    /// Clustering radius in kilometres.
    pub radius_km: f64,
}

impl fmt::Display for ClusteringBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},r={}", self.point_count, self.radius_km)
    }
}

/// Parameters for a graph or routing benchmark run.
#[derive(Clone, Debug)]
pub struct RoutingBenchParams {
    /// Number of clusters, and therefore graph nodes.
    pub cluster_count: usize,
    /// Nearest-neighbour edges added per node.
    pub neighbours: usize,
}

impl fmt::Display for RoutingBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.cluster_count, self.neighbours)
    }
}
