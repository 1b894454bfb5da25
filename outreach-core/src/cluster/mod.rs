//! Radius-based spatial clustering of patient records.
//!
//! Every pair of points within the radius is merged in a [`DisjointSet`];
//! clusters are then read off in the order their roots are first met while
//! scanning the input, so ids are stable for a fixed input order.

mod index;

use tracing::{debug, instrument};

use crate::{
    error::{OutreachError, Result},
    geo::Coordinate,
    point::Point,
    union_find::DisjointSet,
};

use self::index::SphereIndex;

/// A group of nearby patient records.
///
/// Clusters are produced by [`compute_clusters`] and never change afterwards.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Cluster {
    id: usize,
    members: Vec<i64>,
    centroid: Coordinate,
}

impl Cluster {
    /// Builds a cluster directly from its parts.
    ///
    /// Mostly useful for tests and callers that already hold grouped data.
    #[must_use]
    pub fn new(id: usize, members: Vec<i64>, centroid: Coordinate) -> Self {
        Self {
            id,
            members,
            centroid,
        }
    }

    /// Position of the cluster in discovery order.
    #[must_use]
    #[rustfmt::skip]
    pub fn id(&self) -> usize { self.id }

    /// Point ids in discovery order.
    #[must_use]
    #[rustfmt::skip]
    pub fn members(&self) -> &[i64] { &self.members }

    /// Arithmetic mean of the member coordinates.
    #[must_use]
    #[rustfmt::skip]
    pub fn centroid(&self) -> Coordinate { self.centroid }

    /// Number of members.
    #[must_use]
    #[rustfmt::skip]
    pub fn size(&self) -> usize { self.members.len() }
}

/// Groups points so that any two points within `radius_km` of each other
/// (directly or through a chain of such neighbours) share a cluster.
///
/// # Errors
/// Returns [`OutreachError::InvalidRadius`] when `radius_km` is negative or
/// not finite.
///
/// # Examples
/// ```
/// use outreach_core::{Point, compute_clusters};
///
/// let points = [
///     Point::new(1, 0.0, 0.0, 6.0),
///     Point::new(2, 0.0, 0.01, 6.0),
///     Point::new(3, 10.0, 10.0, 6.0),
/// ];
/// let clusters = compute_clusters(&points, 5.0)?;
/// assert_eq!(clusters.len(), 2);
/// assert_eq!(clusters[0].members(), &[1, 2]);
/// assert_eq!(clusters[1].members(), &[3]);
/// # Ok::<(), outreach_core::OutreachError>(())
/// ```
#[instrument(name = "core.compute_clusters", skip(points), fields(points = points.len()))]
pub fn compute_clusters(points: &[Point], radius_km: f64) -> Result<Vec<Cluster>> {
    validate_radius(radius_km)?;
    if points.is_empty() {
        debug!("no points supplied, returning no clusters");
        return Ok(Vec::new());
    }

    let index = SphereIndex::build(points.iter().map(Point::coordinate));
    let mut set = DisjointSet::new(points.len());
    index.for_each_pair_within(radius_km, |left, right| {
        set.union(left, right);
    });

    let clusters = group_by_root(points, &mut set);
    debug!(clusters = clusters.len(), "clustering completed");
    Ok(clusters)
}

pub(crate) fn validate_radius(radius_km: f64) -> Result<()> {
    if radius_km.is_finite() && radius_km >= 0.0 {
        Ok(())
    } else {
        Err(OutreachError::InvalidRadius { got: radius_km })
    }
}

struct Accumulator {
    members: Vec<i64>,
    latitude_sum: f64,
    longitude_sum: f64,
}

fn group_by_root(points: &[Point], set: &mut DisjointSet) -> Vec<Cluster> {
    let mut slot_for_root: Vec<Option<usize>> = vec![None; points.len()];
    let mut groups: Vec<Accumulator> = Vec::with_capacity(set.component_count());

    for (index, point) in points.iter().enumerate() {
        let root = set.find(index);
        let slot = *slot_for_root[root].get_or_insert_with(|| {
            groups.push(Accumulator {
                members: Vec::new(),
                latitude_sum: 0.0,
                longitude_sum: 0.0,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.members.push(point.id());
        group.latitude_sum += point.latitude();
        group.longitude_sum += point.longitude();
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(id, group)| {
            let size = group.members.len() as f64;
            Cluster {
                id,
                centroid: Coordinate::new(group.latitude_sum / size, group.longitude_sum / size),
                members: group.members,
            }
        })
        .collect()
}
