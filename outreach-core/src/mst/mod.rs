//! Minimum spanning tree over cluster centroids, augmented with each node's
//! nearest neighbours.
//!
//! Kruskal's algorithm runs over the distance-sorted candidate edges with a
//! fresh [`DisjointSet`] and stops once `n - 1` edges are accepted. Each node
//! then contributes up to `k` extra edges to its nearest neighbours, skipping
//! any unordered pair already present, so the tree gains short redundant links
//! for route alternatives.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::{
    cluster::Cluster,
    geo::Coordinate,
    graph::{CandidateEdge, Weighting, candidate_edges},
    union_find::DisjointSet,
    zone::ZoneAttributes,
};

/// Why an edge is part of the augmented graph.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeKind {
    /// Accepted by Kruskal's algorithm.
    Mst,
    /// Added by the nearest-neighbour pass.
    Extra,
}

/// An undirected edge between two clusters of an [`AugmentedGraph`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    a: usize,
    b: usize,
    distance_km: f64,
    sanitary_weight: Option<f64>,
    kind: EdgeKind,
    centroid_a: Coordinate,
    centroid_b: Coordinate,
    zone: Option<ZoneAttributes>,
}

impl Edge {
    fn from_candidate(candidate: &CandidateEdge, kind: EdgeKind, clusters: &[Cluster]) -> Self {
        Self {
            a: candidate.a(),
            b: candidate.b(),
            distance_km: candidate.distance_km(),
            sanitary_weight: candidate.sanitary_weight(),
            kind,
            centroid_a: clusters[candidate.a()].centroid(),
            centroid_b: clusters[candidate.b()].centroid(),
            zone: candidate.zone(),
        }
    }

    /// Lower endpoint index.
    #[must_use]
    #[rustfmt::skip]
    pub fn a(&self) -> usize { self.a }

    /// Higher endpoint index.
    #[must_use]
    #[rustfmt::skip]
    pub fn b(&self) -> usize { self.b }

    /// Great-circle distance between the endpoint centroids.
    #[must_use]
    #[rustfmt::skip]
    pub fn distance_km(&self) -> f64 { self.distance_km }

    /// Zone-adjusted cost, present for sanitary-weighted graphs.
    #[must_use]
    #[rustfmt::skip]
    pub fn sanitary_weight(&self) -> Option<f64> { self.sanitary_weight }

    /// Whether the edge came from the tree or the neighbour pass.
    #[must_use]
    #[rustfmt::skip]
    pub fn kind(&self) -> EdgeKind { self.kind }

    /// Centroid of cluster `a`.
    #[must_use]
    #[rustfmt::skip]
    pub fn centroid_a(&self) -> Coordinate { self.centroid_a }

    /// Centroid of cluster `b`.
    #[must_use]
    #[rustfmt::skip]
    pub fn centroid_b(&self) -> Coordinate { self.centroid_b }

    /// Zone attributes used in the sanitary weight.
    #[must_use]
    #[rustfmt::skip]
    pub fn zone(&self) -> Option<ZoneAttributes> { self.zone }

    /// Routing cost: the sanitary weight when present, otherwise the distance.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.sanitary_weight.unwrap_or(self.distance_km)
    }
}

/// Spanning tree plus nearest-neighbour edges over a set of clusters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AugmentedGraph {
    node_count: usize,
    clusters: Vec<Cluster>,
    mst_edges: Vec<Edge>,
    extra_edges: Vec<Edge>,
}

impl AugmentedGraph {
    /// Number of nodes, one per retained cluster.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.node_count }

    /// Retained clusters; node `i` is `clusters()[i]`.
    #[must_use]
    #[rustfmt::skip]
    pub fn clusters(&self) -> &[Cluster] { &self.clusters }

    /// Tree edges in acceptance order.
    #[must_use]
    #[rustfmt::skip]
    pub fn mst_edges(&self) -> &[Edge] { &self.mst_edges }

    /// Neighbour edges in acceptance order.
    #[must_use]
    #[rustfmt::skip]
    pub fn extra_edges(&self) -> &[Edge] { &self.extra_edges }

    /// Tree edges followed by neighbour edges.
    pub fn all_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.mst_edges.iter().chain(&self.extra_edges)
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.mst_edges.len() + self.extra_edges.len()
    }
}

/// Keeps clusters with at least `min_size` members, then builds the minimum
/// spanning tree and adds up to `neighbours` nearest-neighbour edges per node.
///
/// # Examples
/// ```
/// use outreach_core::{Cluster, Coordinate, Weighting, build_augmented_graph};
///
/// let clusters: Vec<Cluster> = (0..4)
///     .map(|i| Cluster::new(i, vec![i as i64], Coordinate::new(0.0, i as f64 * 0.1)))
///     .collect();
/// let graph = build_augmented_graph(&clusters, 1, 3, Weighting::Distance);
/// assert_eq!(graph.node_count(), 4);
/// assert_eq!(graph.mst_edges().len(), 3);
/// assert_eq!(graph.edge_count(), 6);
/// ```
#[must_use]
#[instrument(
    name = "core.build_augmented_graph",
    skip(clusters, weighting),
    fields(clusters = clusters.len())
)]
pub fn build_augmented_graph(
    clusters: &[Cluster],
    min_size: usize,
    neighbours: usize,
    weighting: Weighting<'_>,
) -> AugmentedGraph {
    let retained: Vec<Cluster> = clusters
        .iter()
        .filter(|cluster| cluster.size() >= min_size)
        .cloned()
        .collect();
    let node_count = retained.len();
    let candidates = candidate_edges(&retained, weighting);

    let mst_edges = kruskal(node_count, &candidates, &retained);
    let extra_edges = nearest_neighbour_edges(node_count, neighbours, &candidates, &mst_edges, &retained);

    debug!(
        nodes = node_count,
        mst_edges = mst_edges.len(),
        extra_edges = extra_edges.len(),
        "augmented graph built"
    );
    AugmentedGraph {
        node_count,
        clusters: retained,
        mst_edges,
        extra_edges,
    }
}

fn kruskal(node_count: usize, candidates: &[CandidateEdge], clusters: &[Cluster]) -> Vec<Edge> {
    let target = node_count.saturating_sub(1);
    let mut set = DisjointSet::new(node_count);
    let mut accepted = Vec::with_capacity(target);
    for candidate in candidates {
        if accepted.len() == target {
            break;
        }
        if set.union(candidate.a(), candidate.b()) {
            accepted.push(Edge::from_candidate(candidate, EdgeKind::Mst, clusters));
        }
    }
    accepted
}

fn nearest_neighbour_edges(
    node_count: usize,
    neighbours: usize,
    candidates: &[CandidateEdge],
    mst_edges: &[Edge],
    clusters: &[Cluster],
) -> Vec<Edge> {
    if neighbours == 0 {
        return Vec::new();
    }

    let by_pair: HashMap<(usize, usize), &CandidateEdge> = candidates
        .iter()
        .map(|candidate| (candidate.key(), candidate))
        .collect();
    let mut present: HashSet<(usize, usize)> =
        mst_edges.iter().map(|edge| (edge.a, edge.b)).collect();

    let mut extras = Vec::new();
    for node in 0..node_count {
        let mut ranked: Vec<(f64, usize)> = (0..node_count)
            .filter(|&other| other != node)
            .filter_map(|other| {
                by_pair
                    .get(&pair_key(node, other))
                    .map(|candidate| (candidate.distance_km(), other))
            })
            .collect();
        ranked.sort_by(|left, right| left.0.total_cmp(&right.0).then(left.1.cmp(&right.1)));

        for &(_, other) in ranked.iter().take(neighbours) {
            let key = pair_key(node, other);
            if !present.insert(key) {
                continue;
            }
            if let Some(candidate) = by_pair.get(&key) {
                extras.push(Edge::from_candidate(candidate, EdgeKind::Extra, clusters));
            }
        }
    }
    extras
}

fn pair_key(left: usize, right: usize) -> (usize, usize) {
    (left.min(right), left.max(right))
}
