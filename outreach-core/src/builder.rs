//! Validated configuration for [`Planner`] instances.

use std::sync::Arc;

use crate::{Result, cluster::validate_radius, planner::Planner, zone::ZoneIndex};

/// Default clustering radius in kilometres.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;
/// Default number of nearest-neighbour edges added per node.
pub const DEFAULT_NEIGHBOURS: usize = 3;
/// Default number of destinations kept when ranking routes.
pub const DEFAULT_TOP_K: usize = 4;

/// Configures and constructs [`Planner`] instances.
///
/// # Examples
/// ```
/// use outreach_core::PlannerBuilder;
///
/// let planner = PlannerBuilder::new()
///     .with_radius_km(2.5)
///     .with_min_cluster_size(3)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(planner.radius_km(), 2.5);
/// assert_eq!(planner.min_cluster_size(), 3);
/// assert_eq!(planner.neighbours(), 3);
/// assert_eq!(planner.top_k(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PlannerBuilder {
    radius_km: f64,
    min_cluster_size: usize,
    neighbours: usize,
    top_k: usize,
    zones: Option<Arc<ZoneIndex>>,
}

impl Default for PlannerBuilder {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            min_cluster_size: 1,
            neighbours: DEFAULT_NEIGHBOURS,
            top_k: DEFAULT_TOP_K,
            zones: None,
        }
    }
}

impl PlannerBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the clustering radius.
    #[must_use]
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    /// Overrides the minimum number of members a cluster needs to become a
    /// graph node.
    #[must_use]
    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = size;
        self
    }

    /// Overrides how many nearest-neighbour edges each node may add.
    #[must_use]
    pub fn with_neighbours(mut self, neighbours: usize) -> Self {
        self.neighbours = neighbours;
        self
    }

    /// Overrides how many destinations a ranking keeps.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Supplies the zone index used for sanitary weighting.
    #[must_use]
    pub fn with_zones(mut self, zones: Arc<ZoneIndex>) -> Self {
        self.zones = Some(zones);
        self
    }

    /// Returns the configured clustering radius.
    #[must_use]
    #[rustfmt::skip]
    pub fn radius_km(&self) -> f64 { self.radius_km }

    /// Validates the configuration and constructs a [`Planner`].
    ///
    /// # Errors
    /// Returns [`crate::OutreachError::InvalidRadius`] when the radius is
    /// negative or not finite.
    pub fn build(self) -> Result<Planner> {
        validate_radius(self.radius_km)?;
        Ok(Planner::new(
            self.radius_km,
            self.min_cluster_size,
            self.neighbours,
            self.top_k,
            self.zones,
        ))
    }
}
