//! Geographic coordinates and geodesic distance.

use std::fmt;

use geo::{Distance, Geodesic, Point};

/// A WGS-84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true if both components are finite and within the valid
    /// latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Geodesic distance on the WGS-84 ellipsoid, in metres.
    ///
    /// The result is symmetric bit-for-bit: the endpoints are put in a fixed
    /// order before the solver runs.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let (a, b) = if (self.lat, self.lon) <= (other.lat, other.lon) {
            (self, other)
        } else {
            (other, self)
        };
        Geodesic.distance(Point::from(a), Point::from(b))
    }

    /// Geodesic distance in kilometres.
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        self.distance_m(other) / 1000.0
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lon, p.lat)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
