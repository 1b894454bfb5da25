//! Candidate edges between cluster centroids.
//!
//! Every unordered pair of clusters becomes a [`CandidateEdge`] carrying its
//! great-circle distance and, when zones are supplied, a sanitary weight that
//! folds the destination zone's attributes into the cost.

use tracing::{debug, instrument};

use crate::{
    cluster::Cluster,
    zone::{ZoneAttributes, ZoneIndex},
};

/// How edge costs are derived.
#[derive(Clone, Copy, Debug, Default)]
pub enum Weighting<'a> {
    /// Costs are plain haversine distances.
    #[default]
    Distance,
    /// Costs add the penalty of the zone covering the higher-indexed endpoint.
    Sanitary(&'a ZoneIndex),
}

/// A weighted pair of clusters, `a < b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateEdge {
    a: usize,
    b: usize,
    distance_km: f64,
    sanitary_weight: Option<f64>,
    zone: Option<ZoneAttributes>,
}

impl CandidateEdge {
    /// Lower endpoint index.
    #[must_use]
    #[rustfmt::skip]
    pub fn a(&self) -> usize { self.a }

    /// Higher endpoint index.
    #[must_use]
    #[rustfmt::skip]
    pub fn b(&self) -> usize { self.b }

    /// Great-circle distance between the two centroids.
    #[must_use]
    #[rustfmt::skip]
    pub fn distance_km(&self) -> f64 { self.distance_km }

    /// Distance adjusted by the zone penalty, when weighting by zones.
    #[must_use]
    #[rustfmt::skip]
    pub fn sanitary_weight(&self) -> Option<f64> { self.sanitary_weight }

    /// Zone attributes that contributed to [`Self::sanitary_weight`].
    #[must_use]
    #[rustfmt::skip]
    pub fn zone(&self) -> Option<ZoneAttributes> { self.zone }

    /// Cost used by the path finder: the sanitary weight when present,
    /// otherwise the distance.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.sanitary_weight.unwrap_or(self.distance_km)
    }

    /// Unordered endpoint pair, already normalised to `(min, max)`.
    #[must_use]
    pub fn key(&self) -> (usize, usize) {
        (self.a, self.b)
    }
}

/// Builds the candidate edge for every pair `i < j`, sorted by distance.
///
/// The sort is stable, so equal distances keep their `(i, j)` generation
/// order. With [`Weighting::Sanitary`] each cluster's zone is resolved once
/// and the weight uses the zone of `j` only.
///
/// # Examples
/// ```
/// use outreach_core::{Cluster, Coordinate, Weighting, candidate_edges};
///
/// let clusters = [
///     Cluster::new(0, vec![1], Coordinate::new(0.0, 0.0)),
///     Cluster::new(1, vec![2], Coordinate::new(0.0, 1.0)),
///     Cluster::new(2, vec![3], Coordinate::new(0.0, 0.5)),
/// ];
/// let edges = candidate_edges(&clusters, Weighting::Distance);
/// assert_eq!(edges.len(), 3);
/// assert_eq!(edges[0].key(), (0, 2));
/// assert!(edges[0].sanitary_weight().is_none());
/// ```
#[must_use]
#[instrument(
    name = "core.candidate_edges",
    skip(clusters, weighting),
    fields(clusters = clusters.len(), weighted = matches!(weighting, Weighting::Sanitary(_)))
)]
pub fn candidate_edges(clusters: &[Cluster], weighting: Weighting<'_>) -> Vec<CandidateEdge> {
    let zones: Option<Vec<ZoneAttributes>> = match weighting {
        Weighting::Distance => None,
        Weighting::Sanitary(index) => Some(
            clusters
                .iter()
                .map(|cluster| {
                    let centroid = cluster.centroid();
                    index.resolve(centroid.latitude(), centroid.longitude())
                })
                .collect(),
        ),
    };

    let n = clusters.len();
    let mut edges = Vec::with_capacity(n.saturating_mul(n.saturating_sub(1)) / 2);
    for (i, left) in clusters.iter().enumerate() {
        for (j, right) in clusters.iter().enumerate().skip(i + 1) {
            let distance_km = left.centroid().haversine_km(right.centroid());
            let zone = zones.as_ref().map(|zones| zones[j]);
            edges.push(CandidateEdge {
                a: i,
                b: j,
                distance_km,
                sanitary_weight: zone.map(|zone| distance_km + zone.penalty()),
                zone,
            });
        }
    }
    edges.sort_by(|left, right| left.distance_km.total_cmp(&right.distance_km));
    debug!(edges = edges.len(), "candidate edges built");
    edges
}
