//! Seeded synthetic patient surveys.
//!
//! Points scatter around a handful of hotspots inside a fixed bounding box so
//! clustering produces a realistic mix of dense groups and isolated records.

use outreach_core::{Cluster, Coordinate, Point};
use rand::{Rng, SeedableRng, rngs::SmallRng};

const LATITUDE_RANGE: (f64, f64) = (-18.0, -0.5);
const LONGITUDE_RANGE: (f64, f64) = (-81.0, -69.0);
const SEVERITY_RANGE: (f64, f64) = (4.0, 14.0);

/// Errors that may occur while generating a synthetic survey.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SyntheticError {
    /// The requested point count was zero.
    #[error("point count must be greater than zero")]
    ZeroPoints,
    /// The requested hotspot count was zero.
    #[error("hotspot count must be greater than zero")]
    ZeroHotspots,
    /// The configured hotspot count exceeded the available points.
    #[error("hotspot count ({hotspot_count}) must not exceed point count ({point_count})")]
    HotspotCountExceedsPointCount {
        /// Number of hotspots requested.
        hotspot_count: usize,
        /// Number of points requested.
        point_count: usize,
    },
    /// The hotspot spread was negative or not finite.
    #[error("spread must be a finite, non-negative number of degrees")]
    InvalidSpread,
}

/// Configuration for [`synthetic_survey`].
#[derive(Clone, Debug)]
pub struct SurveyConfig {
    /// Number of patient records to generate.
    pub point_count: usize,
    /// Number of hotspots the records gather around.
    pub hotspot_count: usize,
    /// Maximum offset from a hotspot in degrees.
    pub spread_deg: f64,
    /// Seed for the generator.
    pub seed: u64,
}

/// Generates a reproducible survey; record ids are `0..point_count`.
///
/// # Errors
/// Returns [`SyntheticError`] when the configuration is unusable.
pub fn synthetic_survey(config: &SurveyConfig) -> Result<Vec<Point>, SyntheticError> {
    validate(config)?;
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let hotspots: Vec<(f64, f64)> = (0..config.hotspot_count)
        .map(|_| random_position(&mut rng))
        .collect();

    let points = (0..config.point_count)
        .zip(hotspots.iter().cycle())
        .map(|(index, &(latitude, longitude))| {
            let (lat_offset, lon_offset) = if config.spread_deg > 0.0 {
                (
                    rng.gen_range(-config.spread_deg..=config.spread_deg),
                    rng.gen_range(-config.spread_deg..=config.spread_deg),
                )
            } else {
                (0.0, 0.0)
            };
            let severity = rng.gen_range(SEVERITY_RANGE.0..SEVERITY_RANGE.1);
            Point::new(
                i64::try_from(index).unwrap_or(i64::MAX),
                latitude + lat_offset,
                longitude + lon_offset,
                severity,
            )
        })
        .collect();
    Ok(points)
}

/// Generates `count` single-member clusters at uniformly random positions.
#[must_use]
pub fn scattered_clusters(count: usize, seed: u64) -> Vec<Cluster> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|id| {
            let (latitude, longitude) = random_position(&mut rng);
            let member = i64::try_from(id).unwrap_or(i64::MAX);
            Cluster::new(id, vec![member], Coordinate::new(latitude, longitude))
        })
        .collect()
}

fn random_position(rng: &mut SmallRng) -> (f64, f64) {
    (
        rng.gen_range(LATITUDE_RANGE.0..LATITUDE_RANGE.1),
        rng.gen_range(LONGITUDE_RANGE.0..LONGITUDE_RANGE.1),
    )
}

fn validate(config: &SurveyConfig) -> Result<(), SyntheticError> {
    if config.point_count == 0 {
        return Err(SyntheticError::ZeroPoints);
    }
    if config.hotspot_count == 0 {
        return Err(SyntheticError::ZeroHotspots);
    }
    if config.hotspot_count > config.point_count {
        return Err(SyntheticError::HotspotCountExceedsPointCount {
            hotspot_count: config.hotspot_count,
            point_count: config.point_count,
        });
    }
    if !config.spread_deg.is_finite() || config.spread_deg < 0.0 {
        return Err(SyntheticError::InvalidSpread);
    }
    Ok(())
}
