use std::convert::Infallible;

use outreach_core::{Point, PointProvider, SeverityBracket, ZoneProvider, ZoneRecord};

/// In-memory point snapshot.
#[derive(Clone)]
pub struct VecPoints {
    points: Vec<Point>,
}

impl VecPoints {
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl PointProvider for VecPoints {
    type Error = Infallible;

    fn name(&self) -> &str {
        "vec-points"
    }

    fn points(&self, bracket: SeverityBracket) -> Result<Vec<Point>, Self::Error> {
        Ok(bracket.filter(&self.points))
    }
}

/// In-memory zone snapshot.
#[derive(Clone)]
pub struct VecZones {
    zones: Vec<ZoneRecord>,
}

impl VecZones {
    #[must_use]
    pub fn new(zones: Vec<ZoneRecord>) -> Self {
        Self { zones }
    }
}

impl ZoneProvider for VecZones {
    type Error = Infallible;

    fn name(&self) -> &str {
        "vec-zones"
    }

    fn zones(&self) -> Result<Vec<ZoneRecord>, Self::Error> {
        Ok(self.zones.clone())
    }
}
