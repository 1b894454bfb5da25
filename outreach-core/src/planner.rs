//! Pipeline entry point tying clustering, graph building and routing to one
//! validated configuration.

use std::sync::Arc;

use tracing::instrument;

use crate::{
    Result,
    cluster::{Cluster, compute_clusters},
    error::OutreachError,
    graph::Weighting,
    mst::{AugmentedGraph, build_augmented_graph},
    path::{RouteGraph, RouteOutcome, find_path},
    point::{Point, PointProvider, SeverityBracket},
    zone::ZoneIndex,
};

/// Runs the outreach pipeline with a fixed configuration.
///
/// # Examples
/// ```
/// use outreach_core::{PlannerBuilder, Point, RouteOutcome};
///
/// let planner = PlannerBuilder::new().with_radius_km(1.0).build()?;
/// let points = [
///     Point::new(1, 0.0, 0.0, 6.0),
///     Point::new(2, 0.0, 0.1, 6.0),
///     Point::new(3, 0.0, 0.2, 6.0),
/// ];
/// let clusters = planner.compute_clusters(&points)?;
/// let graph = planner.build_augmented_graph(&clusters, false)?;
/// let RouteOutcome::Path(path) = planner.find_path(&graph, 0, Some(2))? else {
///     unreachable!("the graph is connected");
/// };
/// assert_eq!(path.nodes().first(), Some(&0));
/// # Ok::<(), outreach_core::OutreachError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Planner {
    radius_km: f64,
    min_cluster_size: usize,
    neighbours: usize,
    top_k: usize,
    zones: Option<Arc<ZoneIndex>>,
}

impl Planner {
    pub(crate) fn new(
        radius_km: f64,
        min_cluster_size: usize,
        neighbours: usize,
        top_k: usize,
        zones: Option<Arc<ZoneIndex>>,
    ) -> Self {
        Self {
            radius_km,
            min_cluster_size,
            neighbours,
            top_k,
            zones,
        }
    }

    /// Clustering radius in kilometres.
    #[must_use]
    #[rustfmt::skip]
    pub fn radius_km(&self) -> f64 { self.radius_km }

    /// Minimum members for a cluster to become a graph node.
    #[must_use]
    #[rustfmt::skip]
    pub fn min_cluster_size(&self) -> usize { self.min_cluster_size }

    /// Nearest-neighbour edges added per node.
    #[must_use]
    #[rustfmt::skip]
    pub fn neighbours(&self) -> usize { self.neighbours }

    /// Destinations kept by a ranking.
    #[must_use]
    #[rustfmt::skip]
    pub fn top_k(&self) -> usize { self.top_k }

    /// Zone index used for sanitary weighting, when configured.
    #[must_use]
    pub fn zones(&self) -> Option<&Arc<ZoneIndex>> {
        self.zones.as_ref()
    }

    /// Loads the points of one severity bracket from `provider`.
    ///
    /// # Errors
    /// Propagates the provider's error.
    #[instrument(name = "core.load_points", skip(self, provider), fields(provider = provider.name()))]
    pub fn load_points<P: PointProvider>(
        &self,
        provider: &P,
        bracket: SeverityBracket,
    ) -> core::result::Result<Vec<Point>, P::Error> {
        provider.points(bracket)
    }

    /// Clusters `points` with the configured radius.
    ///
    /// # Errors
    /// Never fails for a planner built through [`crate::PlannerBuilder`]; the
    /// result type mirrors [`compute_clusters`].
    pub fn compute_clusters(&self, points: &[Point]) -> Result<Vec<Cluster>> {
        compute_clusters(points, self.radius_km)
    }

    /// Builds the augmented graph, weighted by zone when `weighted` is set.
    ///
    /// # Errors
    /// Returns [`OutreachError::MissingZoneIndex`] when `weighted` is set but
    /// no zone index was configured.
    pub fn build_augmented_graph(
        &self,
        clusters: &[Cluster],
        weighted: bool,
    ) -> Result<AugmentedGraph> {
        let weighting = if weighted {
            let zones = self.zones.as_deref().ok_or(OutreachError::MissingZoneIndex)?;
            Weighting::Sanitary(zones)
        } else {
            Weighting::Distance
        };
        Ok(build_augmented_graph(
            clusters,
            self.min_cluster_size,
            self.neighbours,
            weighting,
        ))
    }

    /// Routes over every edge of `graph`, keeping the configured top-K when
    /// no destination is given.
    ///
    /// # Errors
    /// Returns [`OutreachError::OutOfRangeNode`] for endpoints outside the
    /// graph.
    pub fn find_path(
        &self,
        graph: &AugmentedGraph,
        origin: usize,
        destination: Option<usize>,
    ) -> Result<RouteOutcome> {
        find_path(&RouteGraph::from_augmented(graph), origin, destination, self.top_k)
    }

    /// Routes over the complete distance graph of `clusters`.
    ///
    /// # Errors
    /// Returns [`OutreachError::OutOfRangeNode`] for endpoints outside the
    /// cluster list.
    pub fn find_direct_path(
        &self,
        clusters: &[Cluster],
        origin: usize,
        destination: Option<usize>,
    ) -> Result<RouteOutcome> {
        find_path(&RouteGraph::complete(clusters), origin, destination, self.top_k)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use rstest::rstest;

    use super::*;
    use crate::{PlannerBuilder, ZoneAttributes, ZoneRecord};

    struct FixedPoints(Vec<Point>);

    impl PointProvider for FixedPoints {
        type Error = Infallible;

        fn name(&self) -> &str {
            "fixed"
        }

        fn points(&self, bracket: SeverityBracket) -> core::result::Result<Vec<Point>, Self::Error> {
            Ok(bracket.filter(&self.0))
        }
    }

    fn line_points() -> Vec<Point> {
        (0..4)
            .map(|index| Point::new(index, 0.0, index as f64 * 0.1, 6.0))
            .collect()
    }

    #[rstest]
    #[case(-0.5)]
    #[case(f64::NAN)]
    fn builder_rejects_invalid_radius(#[case] radius: f64) {
        let err = PlannerBuilder::new()
            .with_radius_km(radius)
            .build()
            .expect_err("radius must be rejected");
        assert_eq!(err.code().as_str(), "OUTREACH_INVALID_RADIUS");
    }

    #[test]
    fn weighted_graph_needs_zones() {
        let planner = PlannerBuilder::new().build().expect("defaults are valid");
        let clusters = planner
            .compute_clusters(&line_points())
            .expect("radius is valid");
        let err = planner
            .build_augmented_graph(&clusters, true)
            .expect_err("zones are missing");
        assert_eq!(err, OutreachError::MissingZoneIndex);
    }

    #[test]
    fn weighted_graph_uses_configured_zones() {
        let zones = Arc::new(ZoneIndex::from_records(vec![ZoneRecord {
            attributes: ZoneAttributes::new(0.0, 1.0, 0.0, 0.0),
            vertices: vec![(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)],
        }]));
        let planner = PlannerBuilder::new()
            .with_radius_km(1.0)
            .with_zones(zones)
            .build()
            .expect("configuration is valid");
        let clusters = planner
            .compute_clusters(&line_points())
            .expect("radius is valid");
        let graph = planner
            .build_augmented_graph(&clusters, true)
            .expect("zones are configured");
        assert!(graph
            .all_edges()
            .all(|edge| edge.sanitary_weight() == Some(edge.distance_km() + 1.0)));
    }

    #[test]
    fn loads_points_for_a_bracket() {
        let provider = FixedPoints(vec![
            Point::new(1, 0.0, 0.0, 6.0),
            Point::new(2, 0.0, 0.0, 9.0),
        ]);
        let planner = PlannerBuilder::new().build().expect("defaults are valid");
        let points = planner
            .load_points(&provider, SeverityBracket::Severe)
            .expect("infallible provider");
        assert_eq!(points.iter().map(Point::id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn direct_and_augmented_routes_agree_on_a_line() {
        let planner = PlannerBuilder::new()
            .with_radius_km(1.0)
            .build()
            .expect("configuration is valid");
        let clusters = planner
            .compute_clusters(&line_points())
            .expect("radius is valid");
        let graph = planner
            .build_augmented_graph(&clusters, false)
            .expect("unweighted graphs need no zones");

        let RouteOutcome::Ranked(augmented) = planner.find_path(&graph, 0, None).expect("valid origin")
        else {
            panic!("expected a ranking");
        };
        let RouteOutcome::Ranked(direct) = planner
            .find_direct_path(&clusters, 0, None)
            .expect("valid origin")
        else {
            panic!("expected a ranking");
        };
        assert_eq!(augmented.routes().len(), 3);
        for (left, right) in augmented.routes().iter().zip(direct.routes()) {
            assert_eq!(left.destination(), right.destination());
            assert!((left.total_cost() - right.total_cost()).abs() < 1e-6);
        }
    }
}
