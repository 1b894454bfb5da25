//! Outreach planner core library.
//!
//! Groups geo-tagged patient records into spatial clusters, links cluster
//! centroids with a minimum spanning tree plus nearest-neighbour edges, and
//! routes across the resulting graph with Bellman-Ford. Edge costs are either
//! plain great-circle distances or distances adjusted by the health-system
//! zone each destination falls in.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod cluster;
mod error;
mod geo;
mod graph;
mod mst;
mod path;
mod planner;
mod point;
pub mod report;
mod union_find;
mod zone;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{DEFAULT_NEIGHBOURS, DEFAULT_RADIUS_KM, DEFAULT_TOP_K, PlannerBuilder},
    cluster::{Cluster, compute_clusters},
    error::{OutreachError, OutreachErrorCode, Result},
    geo::{Coordinate, EARTH_RADIUS_KM, haversine_km, round3},
    graph::{CandidateEdge, Weighting, candidate_edges},
    mst::{AugmentedGraph, Edge, EdgeKind, build_augmented_graph},
    path::{Link, NegativeCycleReport, PathResult, RankedRoutes, RouteGraph, RouteOutcome, find_path},
    planner::Planner,
    point::{Point, PointProvider, SeverityBand, SeverityBracket},
    union_find::DisjointSet,
    zone::{Zone, ZoneAttributes, ZoneCatalog, ZoneIndex, ZoneProvider, ZoneRecord},
};
