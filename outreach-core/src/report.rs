//! Presentation records for pipeline outputs.
//!
//! Every quantity is rounded to three decimals here and nowhere else, so
//! the pipeline itself always works at full precision.

use crate::{
    cluster::Cluster,
    geo::{Coordinate, round3},
    mst::{AugmentedGraph, Edge, EdgeKind},
    path::{Link, NegativeCycleReport, PathResult, RouteOutcome},
    point::{Point, SeverityBand},
    zone::{ZoneAttributes, ZoneIndex},
};

/// `[latitude, longitude]` rounded to three decimals.
pub type RoundedCoordinate = [f64; 2];

fn rounded(coordinate: Coordinate) -> RoundedCoordinate {
    [round3(coordinate.latitude()), round3(coordinate.longitude())]
}

fn rounded_attributes(attributes: ZoneAttributes) -> ZoneAttributes {
    ZoneAttributes::new(
        round3(attributes.accessibility),
        round3(attributes.risk),
        round3(attributes.bonus),
        round3(attributes.score),
    )
}

/// One patient record with its display band.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PointReport {
    /// Record identifier.
    pub id: i64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Severity reading.
    pub severity: f64,
    /// Display band of the reading.
    pub band: SeverityBand,
    /// Hex colour of the band.
    pub colour: &'static str,
}

impl From<&Point> for PointReport {
    fn from(point: &Point) -> Self {
        let band = point.band();
        Self {
            id: point.id(),
            latitude: round3(point.latitude()),
            longitude: round3(point.longitude()),
            severity: round3(point.severity()),
            band,
            colour: band.colour(),
        }
    }
}

/// Summary of one cluster.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClusterReport {
    /// Cluster id in discovery order.
    pub id: usize,
    /// Number of members.
    pub size: usize,
    /// Rounded centroid.
    pub centroid: RoundedCoordinate,
    /// Member point ids.
    pub members: Vec<i64>,
}

impl From<&Cluster> for ClusterReport {
    fn from(cluster: &Cluster) -> Self {
        Self {
            id: cluster.id(),
            size: cluster.size(),
            centroid: rounded(cluster.centroid()),
            members: cluster.members().to_vec(),
        }
    }
}

/// Clustering output for one severity bracket.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClusteringReport {
    /// Bracket token the points were selected with.
    pub bracket: String,
    /// Number of clusters.
    pub count: usize,
    /// Clusters in discovery order.
    pub clusters: Vec<ClusterReport>,
    /// The clustered points with their display bands.
    pub points: Vec<PointReport>,
}

impl ClusteringReport {
    /// Builds the report for `clusters` computed from `points`.
    #[must_use]
    pub fn new(bracket: impl Into<String>, clusters: &[Cluster], points: &[Point]) -> Self {
        Self {
            bracket: bracket.into(),
            count: clusters.len(),
            clusters: clusters.iter().map(ClusterReport::from).collect(),
            points: points.iter().map(PointReport::from).collect(),
        }
    }
}

/// One edge of an augmented graph.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EdgeReport {
    /// Lower endpoint index.
    pub a: usize,
    /// Higher endpoint index.
    pub b: usize,
    /// Tree or neighbour edge.
    pub kind: EdgeKind,
    /// Rounded distance in kilometres.
    pub distance_km: f64,
    /// Rounded sanitary weight, when weighted.
    pub sanitary_weight: Option<f64>,
    /// Rounded centroid of `a`.
    pub centroid_a: RoundedCoordinate,
    /// Rounded centroid of `b`.
    pub centroid_b: RoundedCoordinate,
    /// Rounded zone attributes used in the weight.
    pub zone: Option<ZoneAttributes>,
}

impl From<&Edge> for EdgeReport {
    fn from(edge: &Edge) -> Self {
        Self {
            a: edge.a(),
            b: edge.b(),
            kind: edge.kind(),
            distance_km: round3(edge.distance_km()),
            sanitary_weight: edge.sanitary_weight().map(round3),
            centroid_a: rounded(edge.centroid_a()),
            centroid_b: rounded(edge.centroid_b()),
            zone: edge.zone().map(rounded_attributes),
        }
    }
}

/// Augmented graph output.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GraphReport {
    /// Number of nodes.
    pub node_count: usize,
    /// Retained clusters; node `i` is `clusters[i]`.
    pub clusters: Vec<ClusterReport>,
    /// Tree edges.
    pub mst_edges: Vec<EdgeReport>,
    /// Neighbour edges.
    pub extra_edges: Vec<EdgeReport>,
}

impl From<&AugmentedGraph> for GraphReport {
    fn from(graph: &AugmentedGraph) -> Self {
        Self {
            node_count: graph.node_count(),
            clusters: graph.clusters().iter().map(ClusterReport::from).collect(),
            mst_edges: graph.mst_edges().iter().map(EdgeReport::from).collect(),
            extra_edges: graph.extra_edges().iter().map(EdgeReport::from).collect(),
        }
    }
}

/// One traversed link.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinkReport {
    /// Link source.
    pub source: usize,
    /// Link target.
    pub target: usize,
    /// Rounded cost.
    pub cost: f64,
}

impl From<&Link> for LinkReport {
    fn from(link: &Link) -> Self {
        Self {
            source: link.source(),
            target: link.target(),
            cost: round3(link.cost()),
        }
    }
}

/// A route to one destination.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PathReport {
    /// Starting node.
    pub origin: usize,
    /// Final node.
    pub destination: usize,
    /// Visited nodes, origin first.
    pub nodes: Vec<usize>,
    /// Traversed links.
    pub links: Vec<LinkReport>,
    /// Rounded total cost.
    pub total_cost: f64,
}

impl From<&PathResult> for PathReport {
    fn from(path: &PathResult) -> Self {
        Self {
            origin: path.origin(),
            destination: path.destination(),
            nodes: path.nodes().to_vec(),
            links: path.links().iter().map(LinkReport::from).collect(),
            total_cost: round3(path.total_cost()),
        }
    }
}

/// A negative cycle found while routing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CycleReport {
    /// Origin of the search.
    pub origin: usize,
    /// Cycle nodes; the first node is repeated at the end.
    pub nodes: Vec<usize>,
    /// Links around the cycle.
    pub links: Vec<LinkReport>,
}

impl From<&NegativeCycleReport> for CycleReport {
    fn from(report: &NegativeCycleReport) -> Self {
        Self {
            origin: report.origin(),
            nodes: report.nodes().to_vec(),
            links: report.links().iter().map(LinkReport::from).collect(),
        }
    }
}

/// Route query output, tagged by `status` when serialised.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum RouteReport {
    /// Shortest path to the requested destination.
    Path(PathReport),
    /// The destination cannot be reached.
    Unreachable {
        /// Starting node.
        origin: usize,
        /// Requested destination.
        destination: usize,
    },
    /// Cheapest routes from the origin.
    Ranked {
        /// Starting node.
        origin: usize,
        /// Routes in ascending cost.
        routes: Vec<PathReport>,
    },
    /// A negative cycle made distances undefined.
    NegativeCycle(CycleReport),
}

impl From<&RouteOutcome> for RouteReport {
    fn from(outcome: &RouteOutcome) -> Self {
        match outcome {
            RouteOutcome::Path(path) => Self::Path(path.into()),
            RouteOutcome::Unreachable {
                origin,
                destination,
            } => Self::Unreachable {
                origin: *origin,
                destination: *destination,
            },
            RouteOutcome::Ranked(ranked) => Self::Ranked {
                origin: ranked.origin(),
                routes: ranked.routes().iter().map(PathReport::from).collect(),
            },
            RouteOutcome::NegativeCycle(cycle) => Self::NegativeCycle(cycle.into()),
        }
    }
}

/// One zone of the index.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ZoneReport {
    /// Position in load order.
    pub index: usize,
    /// Rounded vertex centroid as `[longitude, latitude]`.
    pub centroid: [f64; 2],
    /// Number of polygon vertices.
    pub vertices: usize,
    /// Rounded attributes.
    pub attributes: ZoneAttributes,
}

/// Zone index listing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ZoneListing {
    /// Number of zones.
    pub count: usize,
    /// Zones in load order.
    pub zones: Vec<ZoneReport>,
}

impl From<&ZoneIndex> for ZoneListing {
    fn from(index: &ZoneIndex) -> Self {
        let zones = index
            .zones()
            .iter()
            .zip(index.centroids())
            .enumerate()
            .map(|(position, (zone, &(lon, lat)))| ZoneReport {
                index: position,
                centroid: [round3(lon), round3(lat)],
                vertices: zone.polygon().len(),
                attributes: rounded_attributes(zone.attributes()),
            })
            .collect();
        Self {
            count: index.len(),
            zones,
        }
    }
}
