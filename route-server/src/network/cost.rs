//! Edge cost strategies.
//!
//! A full shortest-path pass uses exactly one [`CostMode`]; matrices computed
//! under different modes are not comparable.

use std::fmt;
use std::str::FromStr;

use crate::domain::Station;

/// Blend coefficients for [`CostMode::Factor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorWeights {
    /// Multiplier for the travelled distance (km).
    pub distance: f64,
    /// Multiplier for the station risk term.
    pub risk: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            distance: 2.0,
            risk: 1.0,
        }
    }
}

/// How an adjacency entry is turned into a relaxation cost.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CostMode {
    /// Geodesic distance; free inside a complex.
    #[default]
    Distance,
    /// Distance blended with the station risk weight.
    Factor(FactorWeights),
}

impl CostMode {
    /// Cost of travelling the edge between `a` and `b` with stored weight
    /// `weight_km`.
    ///
    /// The result is symmetric in `a` and `b` and never negative.
    pub fn edge_cost(&self, a: &Station, b: &Station, weight_km: f64) -> f64 {
        let distance = if a.shares_complex(b) { 0.0 } else { weight_km };
        match self {
            CostMode::Distance => distance,
            CostMode::Factor(weights) => {
                calc_factor(*weights, distance, a.weight().max(b.weight()))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CostMode::Distance => "distance",
            CostMode::Factor(_) => "factor",
        }
    }
}

impl fmt::Display for CostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown cost mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cost mode {0:?} (expected \"distance\" or \"factor\")")]
pub struct InvalidCostMode(pub String);

impl FromStr for CostMode {
    type Err = InvalidCostMode;

    /// Parses `distance` or `factor` (default weights), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(CostMode::Distance),
            "factor" => Ok(CostMode::Factor(FactorWeights::default())),
            _ => Err(InvalidCostMode(s.to_string())),
        }
    }
}

/// `weights.distance × distance + weights.risk × risk`, or zero when the
/// distance is zero (same-location moves are free whatever the risk).
pub fn calc_factor(weights: FactorWeights, distance: f64, risk: f64) -> f64 {
    if distance == 0.0 {
        return 0.0;
    }
    weights.distance * distance + weights.risk * risk
}
