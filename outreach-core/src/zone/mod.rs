//! Health-system zones and the resolver that maps a coordinate to the
//! attributes of the zone it falls in.
//!
//! Resolution scans zones in load order and returns the first polygon that
//! contains the point. Points outside every polygon fall back to the zone
//! whose vertex centroid is nearest in planar `(longitude, latitude)` space,
//! and an empty index resolves to [`ZoneAttributes::default`].

mod catalog;
mod polygon;

pub use self::catalog::ZoneCatalog;

use tracing::{debug, warn};

/// Health-system attributes attached to a zone.
///
/// # Examples
/// ```
/// use outreach_core::ZoneAttributes;
///
/// let attributes = ZoneAttributes::new(2.0, 3.0, 1.0, 0.5);
/// assert_eq!(attributes.penalty(), 3.5);
/// assert_eq!(ZoneAttributes::default().penalty(), 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ZoneAttributes {
    /// Difficulty of reaching care; higher is worse.
    pub accessibility: f64,
    /// Local health risk; higher is worse.
    pub risk: f64,
    /// Incentive bonus granted for serving the zone.
    pub bonus: f64,
    /// Incentive score granted for serving the zone.
    pub score: f64,
}

impl ZoneAttributes {
    /// Creates an attribute record.
    #[must_use]
    pub const fn new(accessibility: f64, risk: f64, bonus: f64, score: f64) -> Self {
        Self {
            accessibility,
            risk,
            bonus,
            score,
        }
    }

    /// Cost added to a travel distance when entering the zone.
    ///
    /// Risk and poor accessibility make the trip dearer, incentives make it
    /// cheaper, so the penalty may be negative.
    #[must_use]
    pub fn penalty(&self) -> f64 {
        self.risk + self.accessibility - self.bonus - self.score
    }
}

/// Raw zone row as supplied by a [`ZoneProvider`].
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneRecord {
    /// Attributes of the zone.
    pub attributes: ZoneAttributes,
    /// Ordered ring of `(longitude, latitude)` vertices.
    pub vertices: Vec<(f64, f64)>,
}

/// A zone accepted into a [`ZoneIndex`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Zone {
    polygon: Vec<(f64, f64)>,
    attributes: ZoneAttributes,
}

impl Zone {
    /// Ordered ring of `(longitude, latitude)` vertices; at least three.
    #[must_use]
    #[rustfmt::skip]
    pub fn polygon(&self) -> &[(f64, f64)] { &self.polygon }

    /// Attributes of the zone.
    #[must_use]
    #[rustfmt::skip]
    pub fn attributes(&self) -> ZoneAttributes { self.attributes }
}

/// Read-only collection of zones with precomputed vertex centroids.
///
/// # Examples
/// ```
/// use outreach_core::{ZoneAttributes, ZoneIndex, ZoneRecord};
///
/// let triangle = ZoneRecord {
///     attributes: ZoneAttributes::new(1.0, 2.0, 0.0, 0.0),
///     vertices: vec![(0.0, 0.0), (3.0, 0.0), (0.0, 3.0)],
/// };
/// let index = ZoneIndex::from_records(vec![triangle]);
/// assert_eq!(index.resolve(1.0, 1.0).risk, 2.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZoneIndex {
    zones: Vec<Zone>,
    centroids: Vec<(f64, f64)>,
}

impl ZoneIndex {
    /// Builds an index, silently dropping rings with fewer than three vertices.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = ZoneRecord>) -> Self {
        let mut zones = Vec::new();
        let mut centroids = Vec::new();
        for (row, record) in records.into_iter().enumerate() {
            if record.vertices.len() < 3 {
                warn!(
                    row,
                    vertices = record.vertices.len(),
                    "skipping degenerate zone polygon"
                );
                continue;
            }
            centroids.push(polygon::vertex_mean(&record.vertices));
            zones.push(Zone {
                polygon: record.vertices,
                attributes: record.attributes,
            });
        }
        debug!(zones = zones.len(), "zone index built");
        Self { zones, centroids }
    }

    /// Zones in load order.
    #[must_use]
    #[rustfmt::skip]
    pub fn zones(&self) -> &[Zone] { &self.zones }

    /// Vertex centroids as `(longitude, latitude)`, parallel to [`Self::zones`].
    #[must_use]
    #[rustfmt::skip]
    pub fn centroids(&self) -> &[(f64, f64)] { &self.centroids }

    /// Number of zones in the index.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.zones.len() }

    /// Returns `true` when the index holds no zones.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.zones.is_empty() }

    /// Resolves the attributes governing the given position.
    #[must_use]
    pub fn resolve(&self, latitude: f64, longitude: f64) -> ZoneAttributes {
        self.containing(latitude, longitude)
            .or_else(|| self.nearest(latitude, longitude))
            .map_or_else(ZoneAttributes::default, |index| self.zones[index].attributes)
    }

    /// Index of the first zone whose polygon contains the position.
    #[must_use]
    pub fn containing(&self, latitude: f64, longitude: f64) -> Option<usize> {
        self.zones
            .iter()
            .position(|zone| polygon::contains(&zone.polygon, longitude, latitude))
    }

    /// Index of the zone whose centroid is nearest by squared planar distance.
    #[must_use]
    pub fn nearest(&self, latitude: f64, longitude: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, &(x, y)) in self.centroids.iter().enumerate() {
            let distance = (x - longitude).powi(2) + (y - latitude).powi(2);
            if best.is_none_or(|(_, current)| distance < current) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }
}

/// Supplies the raw zone rows used to build a [`ZoneIndex`].
pub trait ZoneProvider {
    /// Error raised when the rows cannot be produced.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns a human-readable name.
    fn name(&self) -> &str;

    /// Returns every zone row.
    ///
    /// # Errors
    /// Returns the provider's error when the underlying snapshot cannot be read.
    fn zones(&self) -> Result<Vec<ZoneRecord>, Self::Error>;
}
