//! Shortest routes between clusters.
//!
//! Costs may be negative once zone incentives outweigh distance, so routing
//! uses Bellman-Ford. A negative cycle reachable from the origin is reported
//! as an outcome rather than an error, since it says something about the
//! zone data rather than about the request.

mod bellman_ford;

use tracing::{debug, instrument, warn};

use crate::{
    cluster::Cluster,
    error::{OutreachError, Result},
    graph::{Weighting, candidate_edges},
    mst::AugmentedGraph,
};

use self::bellman_ford::{DirectedArc, Relaxation, relax, trace_path};

/// An edge record of a [`RouteGraph`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Link {
    source: usize,
    target: usize,
    cost: f64,
}

impl Link {
    /// Creates a link between two node indices.
    #[must_use]
    pub const fn new(source: usize, target: usize, cost: f64) -> Self {
        Self {
            source,
            target,
            cost,
        }
    }

    /// Node the link starts from.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> usize { self.source }

    /// Node the link ends at.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> usize { self.target }

    /// Traversal cost.
    #[must_use]
    #[rustfmt::skip]
    pub fn cost(&self) -> f64 { self.cost }

    fn joins(&self, left: usize, right: usize) -> bool {
        (self.source == left && self.target == right)
            || (self.source == right && self.target == left)
    }
}

/// Weighted graph handed to [`find_path`].
///
/// Undirected graphs expand each link into two arcs of equal cost.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteGraph {
    node_count: usize,
    links: Vec<Link>,
    arcs: Vec<DirectedArc>,
}

impl RouteGraph {
    /// Builds an undirected graph.
    ///
    /// # Errors
    /// Returns [`OutreachError::OutOfRangeNode`] when a link names a node
    /// outside `0..node_count`.
    pub fn undirected(node_count: usize, links: Vec<Link>) -> Result<Self> {
        validate_links(node_count, &links)?;
        Ok(Self::undirected_unchecked(node_count, links))
    }

    /// Builds a directed graph; each link is traversable from source to
    /// target only.
    ///
    /// # Errors
    /// Returns [`OutreachError::OutOfRangeNode`] when a link names a node
    /// outside `0..node_count`.
    pub fn directed(node_count: usize, links: Vec<Link>) -> Result<Self> {
        validate_links(node_count, &links)?;
        let arcs = links
            .iter()
            .map(|link| DirectedArc {
                from: link.source,
                to: link.target,
                cost: link.cost,
            })
            .collect();
        Ok(Self {
            node_count,
            links,
            arcs,
        })
    }

    /// Undirected graph over every edge of an augmented graph, tree edges
    /// first.
    #[must_use]
    pub fn from_augmented(graph: &AugmentedGraph) -> Self {
        let links = graph
            .all_edges()
            .map(|edge| Link::new(edge.a(), edge.b(), edge.cost()))
            .collect();
        Self::undirected_unchecked(graph.node_count(), links)
    }

    /// Undirected complete graph over the clusters, costed by distance.
    #[must_use]
    pub fn complete(clusters: &[Cluster]) -> Self {
        let links = candidate_edges(clusters, Weighting::Distance)
            .iter()
            .map(|edge| Link::new(edge.a(), edge.b(), edge.distance_km()))
            .collect();
        Self::undirected_unchecked(clusters.len(), links)
    }

    fn undirected_unchecked(node_count: usize, links: Vec<Link>) -> Self {
        let arcs = links
            .iter()
            .flat_map(|link| {
                [
                    DirectedArc {
                        from: link.source,
                        to: link.target,
                        cost: link.cost,
                    },
                    DirectedArc {
                        from: link.target,
                        to: link.source,
                        cost: link.cost,
                    },
                ]
            })
            .collect();
        Self {
            node_count,
            links,
            arcs,
        }
    }

    /// Number of nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn node_count(&self) -> usize { self.node_count }

    /// Link records in insertion order.
    #[must_use]
    #[rustfmt::skip]
    pub fn links(&self) -> &[Link] { &self.links }

    /// Number of directed arcs relaxed per pass.
    #[must_use]
    #[rustfmt::skip]
    pub fn arc_count(&self) -> usize { self.arcs.len() }

    /// First link joining the two nodes, in either direction.
    #[must_use]
    pub fn link_between(&self, left: usize, right: usize) -> Option<Link> {
        self.links
            .iter()
            .copied()
            .find(|link| link.joins(left, right))
    }

    fn links_along(&self, nodes: &[usize]) -> Vec<Link> {
        nodes
            .windows(2)
            .filter_map(|pair| self.link_between(pair[0], pair[1]))
            .collect()
    }

    fn ensure_node(&self, node: usize) -> Result<()> {
        if node < self.node_count {
            Ok(())
        } else {
            Err(OutreachError::OutOfRangeNode {
                node,
                node_count: self.node_count,
            })
        }
    }
}

fn validate_links(node_count: usize, links: &[Link]) -> Result<()> {
    for link in links {
        for node in [link.source, link.target] {
            if node >= node_count {
                return Err(OutreachError::OutOfRangeNode { node, node_count });
            }
        }
    }
    Ok(())
}

/// A route from an origin to one destination.
#[derive(Clone, Debug, PartialEq)]
pub struct PathResult {
    origin: usize,
    destination: usize,
    nodes: Vec<usize>,
    links: Vec<Link>,
    total_cost: f64,
}

impl PathResult {
    /// Starting node.
    #[must_use]
    #[rustfmt::skip]
    pub fn origin(&self) -> usize { self.origin }

    /// Final node.
    #[must_use]
    #[rustfmt::skip]
    pub fn destination(&self) -> usize { self.destination }

    /// Nodes visited, origin first.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[usize] { &self.nodes }

    /// Link records traversed between consecutive nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn links(&self) -> &[Link] { &self.links }

    /// Shortest-path cost from origin to destination.
    #[must_use]
    #[rustfmt::skip]
    pub fn total_cost(&self) -> f64 { self.total_cost }
}

/// Reachable destinations ordered by cost.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedRoutes {
    origin: usize,
    routes: Vec<PathResult>,
}

impl RankedRoutes {
    /// Starting node shared by every route.
    #[must_use]
    #[rustfmt::skip]
    pub fn origin(&self) -> usize { self.origin }

    /// Routes in ascending cost, ties broken by destination index.
    #[must_use]
    #[rustfmt::skip]
    pub fn routes(&self) -> &[PathResult] { &self.routes }
}

/// A negative-cost cycle reachable from the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct NegativeCycleReport {
    origin: usize,
    nodes: Vec<usize>,
    links: Vec<Link>,
}

impl NegativeCycleReport {
    /// Origin of the search that found the cycle.
    #[must_use]
    #[rustfmt::skip]
    pub fn origin(&self) -> usize { self.origin }

    /// Cycle nodes in traversal order; the first node is repeated at the end.
    #[must_use]
    #[rustfmt::skip]
    pub fn nodes(&self) -> &[usize] { &self.nodes }

    /// Link records along the cycle.
    #[must_use]
    #[rustfmt::skip]
    pub fn links(&self) -> &[Link] { &self.links }

    /// Sum of the link costs around the cycle.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.links.iter().map(Link::cost).sum()
    }
}

/// Result of a [`find_path`] query.
#[derive(Clone, Debug, PartialEq)]
pub enum RouteOutcome {
    /// Shortest path to the requested destination.
    Path(PathResult),
    /// The destination cannot be reached from the origin.
    Unreachable {
        /// Starting node.
        origin: usize,
        /// Requested destination.
        destination: usize,
    },
    /// Cheapest routes to every reachable node when no destination was given.
    Ranked(RankedRoutes),
    /// Distances are undefined because a negative cycle is reachable.
    NegativeCycle(NegativeCycleReport),
}

/// Runs Bellman-Ford from `origin`.
///
/// With a destination the outcome is a [`RouteOutcome::Path`] or
/// [`RouteOutcome::Unreachable`]; without one it ranks every other reachable
/// node by cost and keeps the first `top_k`.
///
/// # Errors
/// Returns [`OutreachError::OutOfRangeNode`] when `origin` or `destination`
/// is not a node of `graph`.
///
/// # Examples
/// ```
/// use outreach_core::{Link, RouteGraph, RouteOutcome, find_path};
///
/// let graph = RouteGraph::undirected(3, vec![Link::new(0, 1, 2.0), Link::new(1, 2, 3.0)])?;
/// let RouteOutcome::Path(path) = find_path(&graph, 0, Some(2), 4)? else {
///     unreachable!("the chain is connected");
/// };
/// assert_eq!(path.nodes(), &[0, 1, 2]);
/// assert_eq!(path.total_cost(), 5.0);
/// # Ok::<(), outreach_core::OutreachError>(())
/// ```
#[instrument(
    name = "core.find_path",
    skip(graph),
    fields(nodes = graph.node_count(), arcs = graph.arc_count())
)]
pub fn find_path(
    graph: &RouteGraph,
    origin: usize,
    destination: Option<usize>,
    top_k: usize,
) -> Result<RouteOutcome> {
    graph.ensure_node(origin)?;
    if let Some(destination) = destination {
        graph.ensure_node(destination)?;
    }

    let (distances, parents) = match relax(graph.node_count, &graph.arcs, origin) {
        Relaxation::Converged { distances, parents } => (distances, parents),
        Relaxation::NegativeCycle(nodes) => {
            let links = graph.links_along(&nodes);
            warn!(cycle_len = links.len(), "negative cycle reachable from origin");
            return Ok(RouteOutcome::NegativeCycle(NegativeCycleReport {
                origin,
                nodes,
                links,
            }));
        }
    };

    let route_to = |target: usize| -> Option<PathResult> {
        if !distances[target].is_finite() {
            return None;
        }
        let nodes = trace_path(&parents, origin, target)?;
        Some(PathResult {
            origin,
            destination: target,
            links: graph.links_along(&nodes),
            nodes,
            total_cost: distances[target],
        })
    };

    if let Some(destination) = destination {
        let outcome = route_to(destination).map_or(
            RouteOutcome::Unreachable {
                origin,
                destination,
            },
            RouteOutcome::Path,
        );
        debug!(reachable = matches!(outcome, RouteOutcome::Path(_)), "route resolved");
        return Ok(outcome);
    }

    let mut reachable: Vec<usize> = (0..graph.node_count)
        .filter(|&node| node != origin && distances[node].is_finite())
        .collect();
    reachable.sort_by(|&left, &right| {
        distances[left]
            .total_cmp(&distances[right])
            .then(left.cmp(&right))
    });
    let routes: Vec<PathResult> = reachable
        .into_iter()
        .take(top_k)
        .filter_map(route_to)
        .collect();
    debug!(routes = routes.len(), "ranked reachable destinations");
    Ok(RouteOutcome::Ranked(RankedRoutes { origin, routes }))
}
