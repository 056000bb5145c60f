//! Station identity and value types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Risk weight given to stations whose source record carries none.
pub const DEFAULT_STATION_WEIGHT: f64 = 0.000072;

/// Sequential station identifier, assigned by the registry.
///
/// Identifiers are stable for the lifetime of a dataset and never reused.
/// They are *not* matrix positions; use `StationSet::index_of` for that.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u32);

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Groups physically co-located stations across lines.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplexId(pub u32);

impl fmt::Debug for ComplexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComplexId({})", self.0)
    }
}

impl fmt::Display for ComplexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node of the transit graph: one platform of one line at one place.
///
/// Stations are immutable once created. Only the registry (and the dump
/// loader, which restores registry output) constructs them.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    id: StationId,
    position: GeoPoint,
    name: String,
    line: String,
    complex: ComplexId,
    weight: f64,
}

impl Station {
    pub fn new(
        id: StationId,
        position: GeoPoint,
        name: impl Into<String>,
        line: impl Into<String>,
        complex: ComplexId,
        weight: f64,
    ) -> Self {
        Self {
            id,
            position,
            name: name.into(),
            line: line.into(),
            complex,
            weight,
        }
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn position(&self) -> GeoPoint {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn complex(&self) -> ComplexId {
        self.complex
    }

    /// Risk weight (e.g. incidents per rider).
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns true if `other` is the same physical station complex.
    pub fn shares_complex(&self, other: &Station) -> bool {
        self.complex == other.complex
    }

    /// Returns true if `other` is on the same line.
    pub fn shares_line(&self, other: &Station) -> bool {
        self.line == other.line
    }

    /// Geodesic distance to `other` in kilometres.
    pub fn distance_km(&self, other: &Station) -> f64 {
        self.position.distance_km(other.position)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) complex {} at {}",
            self.id, self.name, self.line, self.complex, self.position
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: u32, name: &str, line: &str, complex: u32) -> Station {
        Station::new(
            StationId(id),
            GeoPoint::new(40.75, -73.98),
            name,
            line,
            ComplexId(complex),
            DEFAULT_STATION_WEIGHT,
        )
    }

    #[test]
    fn shares_complex_and_line() {
        let a = station(1, "Times Sq", "1", 611);
        let b = station(2, "Times Sq", "N", 611);
        let c = station(3, "34 St", "1", 164);
        assert!(a.shares_complex(&b));
        assert!(!a.shares_line(&b));
        assert!(a.shares_line(&c));
        assert!(!a.shares_complex(&c));
    }

    #[test]
    fn display_and_debug() {
        assert_eq!(StationId(7).to_string(), "7");
        assert_eq!(format!("{:?}", StationId(7)), "StationId(7)");
        assert_eq!(format!("{:?}", ComplexId(611)), "ComplexId(611)");
        let s = station(1, "Times Sq", "1", 611);
        assert!(s.to_string().starts_with("1 Times Sq (1) complex 611"));
    }
}
