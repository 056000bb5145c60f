//! Build and itinerary configuration for the route planner.

use chrono::Duration;

use crate::domain::DEFAULT_STATION_WEIGHT;
use crate::network::FactorWeights;
use crate::walkable::DEFAULT_WALK_RADIUS_M;

/// Configuration parameters for building and querying a route table.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    /// First id handed out by the station registry.
    pub start_id: u32,

    /// Maximum distance (metres) between stations joined by a walk edge.
    pub walk_radius_m: f64,

    /// Risk weight for stations whose record carries none.
    pub default_weight: f64,

    /// Average train speed used to estimate travel time (km/h).
    pub average_speed_kmh: f64,

    /// Flat fare charged per itinerary.
    pub fare: f64,

    /// Coefficients used when the cost mode is `factor`.
    pub factor_weights: FactorWeights,
}

impl NetworkConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        start_id: u32,
        walk_radius_m: f64,
        default_weight: f64,
        average_speed_kmh: f64,
        fare: f64,
        factor_weights: FactorWeights,
    ) -> Self {
        Self {
            start_id,
            walk_radius_m,
            default_weight,
            average_speed_kmh,
            fare,
            factor_weights,
        }
    }

    /// Estimated time to cover `distance_km` at the average speed, in
    /// whole minutes (rounded to nearest).
    pub fn travel_minutes(&self, distance_km: f64) -> i64 {
        if self.average_speed_kmh <= 0.0 {
            return 0;
        }
        (distance_km / self.average_speed_kmh * 60.0).round() as i64
    }

    /// Returns the estimated travel time as a Duration.
    pub fn travel_time(&self, distance_km: f64) -> Duration {
        Duration::minutes(self.travel_minutes(distance_km))
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            start_id: 1,
            walk_radius_m: DEFAULT_WALK_RADIUS_M,
            default_weight: DEFAULT_STATION_WEIGHT,
            average_speed_kmh: 30.0,
            fare: 2.90,
            factor_weights: FactorWeights::default(),
        }
    }
}
