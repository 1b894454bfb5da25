//! Geographic primitives shared by the clusterer and the graph builder.

use std::f64::consts::PI;

/// Mean Earth radius in kilometres used for every great-circle computation.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A latitude/longitude pair in decimal degrees.
///
/// # Examples
/// ```
/// use outreach_core::Coordinate;
///
/// let lima = Coordinate::new(-12.0464, -77.0428);
/// assert_eq!(lima.latitude(), -12.0464);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from decimal degrees.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns the latitude in degrees.
    #[must_use]
    #[rustfmt::skip]
    pub const fn latitude(&self) -> f64 { self.latitude }

    /// Returns the longitude in degrees.
    #[must_use]
    #[rustfmt::skip]
    pub const fn longitude(&self) -> f64 { self.longitude }

    /// Great-circle distance to `other` in kilometres.
    ///
    /// # Examples
    /// ```
    /// use outreach_core::Coordinate;
    ///
    /// let origin = Coordinate::new(0.0, 0.0);
    /// let east = Coordinate::new(0.0, 1.0);
    /// assert!((origin.haversine_km(east) - 111.195).abs() < 1e-3);
    /// ```
    #[must_use]
    pub fn haversine_km(self, other: Self) -> f64 {
        haversine_km(self, other)
    }

    /// Position of the coordinate on the unit sphere.
    pub(crate) fn unit_vector(self) -> [f64; 3] {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat]
    }
}

/// Haversine distance between two coordinates in kilometres.
#[must_use]
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();

    let half_lat = (d_lat / 2.0).sin();
    let half_lon = (d_lon / 2.0).sin();
    let a = half_lat * half_lat + lat1.cos() * lat2.cos() * half_lon * half_lon;
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Converts a surface radius in kilometres into the straight-line chord
/// length between two points on the unit sphere separated by that radius.
///
/// Radii spanning half the circumference or more saturate at the sphere's
/// diameter.
pub(crate) fn chord_for_radius_km(radius_km: f64) -> f64 {
    let angle = (radius_km / EARTH_RADIUS_KM).min(PI);
    2.0 * (angle / 2.0).sin()
}

/// Rounds a reported quantity to three decimal places.
///
/// # Examples
/// ```
/// use outreach_core::round3;
///
/// assert_eq!(round3(1.23456), 1.235);
/// ```
#[must_use]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
