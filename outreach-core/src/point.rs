//! Patient records and the severity brackets used to select them.

use std::{fmt, str::FromStr};

use crate::{error::OutreachError, geo::Coordinate};

/// A geo-tagged patient record.
///
/// # Examples
/// ```
/// use outreach_core::Point;
///
/// let point = Point::new(7, -12.05, -77.04, 9.4);
/// assert_eq!(point.id(), 7);
/// assert_eq!(point.coordinate().longitude(), -77.04);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Point {
    id: i64,
    latitude: f64,
    longitude: f64,
    severity: f64,
}

impl Point {
    /// Creates a point from its identifier, position in degrees and severity.
    #[must_use]
    pub const fn new(id: i64, latitude: f64, longitude: f64, severity: f64) -> Self {
        Self {
            id,
            latitude,
            longitude,
            severity,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    #[rustfmt::skip]
    pub const fn id(&self) -> i64 { self.id }

    /// Returns the latitude in degrees.
    #[must_use]
    #[rustfmt::skip]
    pub const fn latitude(&self) -> f64 { self.latitude }

    /// Returns the longitude in degrees.
    #[must_use]
    #[rustfmt::skip]
    pub const fn longitude(&self) -> f64 { self.longitude }

    /// Returns the severity (haemoglobin) reading.
    #[must_use]
    #[rustfmt::skip]
    pub const fn severity(&self) -> f64 { self.severity }

    /// Returns the position as a [`Coordinate`].
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Classifies the severity reading for display.
    #[must_use]
    pub fn band(&self) -> SeverityBand {
        SeverityBand::classify(self.severity)
    }
}

/// Severity bracket used to select the points fed to the clusterer.
///
/// Lower readings are more severe. Brackets are half-open on the upper bound.
///
/// | token   | range            |
/// |---------|------------------|
/// | `alta`  | `s < 8`          |
/// | `media` | `8 <= s < 10`    |
/// | `baja`  | `10 <= s < 12`   |
/// | `none`  | `s >= 12`        |
///
/// # Examples
/// ```
/// use outreach_core::SeverityBracket;
///
/// let bracket: SeverityBracket = "media".parse()?;
/// assert!(bracket.contains(9.0));
/// assert!(!bracket.contains(10.0));
/// # Ok::<(), outreach_core::OutreachError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SeverityBracket {
    /// Readings below 8.
    Severe,
    /// Readings in `[8, 10)`.
    Moderate,
    /// Readings in `[10, 12)`.
    Mild,
    /// Readings of 12 and above.
    Unaffected,
}

impl SeverityBracket {
    /// Every bracket in ascending reading order.
    pub const ALL: [Self; 4] = [Self::Severe, Self::Moderate, Self::Mild, Self::Unaffected];

    /// Returns the wire token for the bracket.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Severe => "alta",
            Self::Moderate => "media",
            Self::Mild => "baja",
            Self::Unaffected => "none",
        }
    }

    /// Returns `true` when `severity` falls inside the bracket.
    #[must_use]
    pub fn contains(self, severity: f64) -> bool {
        match self {
            Self::Severe => severity < 8.0,
            Self::Moderate => (8.0..10.0).contains(&severity),
            Self::Mild => (10.0..12.0).contains(&severity),
            Self::Unaffected => severity >= 12.0,
        }
    }

    /// Keeps the points whose severity falls inside the bracket.
    #[must_use]
    pub fn filter(self, points: &[Point]) -> Vec<Point> {
        points
            .iter()
            .filter(|point| self.contains(point.severity()))
            .copied()
            .collect()
    }
}

impl FromStr for SeverityBracket {
    type Err = OutreachError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bracket| bracket.token() == token)
            .ok_or_else(|| OutreachError::InvalidSeverityBracket {
                token: token.to_owned(),
            })
    }
}

impl fmt::Display for SeverityBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Display classification of a single reading.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeverityBand {
    /// Readings below 10.
    Critical,
    /// Readings in `[10, 12)`.
    Moderate,
    /// Readings of 12 and above.
    Normal,
}

impl SeverityBand {
    /// Classifies a reading.
    #[must_use]
    pub fn classify(severity: f64) -> Self {
        if severity < 10.0 {
            Self::Critical
        } else if severity < 12.0 {
            Self::Moderate
        } else {
            Self::Normal
        }
    }

    /// Hex colour used when plotting the band.
    #[must_use]
    pub const fn colour(self) -> &'static str {
        match self {
            Self::Critical => "#ef4444",
            Self::Moderate => "#f59e0b",
            Self::Normal => "#22c55e",
        }
    }
}

/// Supplies patient records already filtered by severity bracket.
///
/// # Examples
/// ```
/// use std::convert::Infallible;
/// use outreach_core::{Point, PointProvider, SeverityBracket};
///
/// struct Fixed(Vec<Point>);
///
/// impl PointProvider for Fixed {
///     type Error = Infallible;
///     fn name(&self) -> &str { "fixed" }
///     fn points(&self, bracket: SeverityBracket) -> Result<Vec<Point>, Infallible> {
///         Ok(bracket.filter(&self.0))
///     }
/// }
///
/// let provider = Fixed(vec![Point::new(1, 0.0, 0.0, 6.0), Point::new(2, 0.0, 0.0, 13.0)]);
/// let severe = provider.points(SeverityBracket::Severe)?;
/// assert_eq!(severe.len(), 1);
/// # Ok::<(), Infallible>(())
/// ```
pub trait PointProvider {
    /// Error raised when the records cannot be produced.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns a human-readable name.
    fn name(&self) -> &str;

    /// Returns every record whose severity falls in `bracket`.
    ///
    /// # Errors
    /// Returns the provider's error when the underlying snapshot cannot be read.
    fn points(&self, bracket: SeverityBracket) -> Result<Vec<Point>, Self::Error>;
}
