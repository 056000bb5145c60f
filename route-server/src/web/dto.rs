//! Data transfer objects for web requests and responses.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::domain::Station;
use crate::planner::{Itinerary, RouteStep};

/// Query for a route between two stations.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// Origin station id
    pub origin: u32,

    /// Destination station id
    pub destination: u32,

    /// Leaving time in HH:MM or HH:MM:SS format (defaults to now)
    pub time: Option<String>,
}

/// A station in listings.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub id: u32,
    pub name: String,
    pub line: String,
    pub complex: u32,
    pub lat: f64,
    pub lon: f64,
}

/// Response listing every station.
#[derive(Debug, Serialize)]
pub struct StationListResponse {
    pub stations: Vec<StationResult>,
}

/// One stop of a route.
#[derive(Debug, Serialize)]
pub struct StepResult {
    /// Station id
    pub id: u32,

    /// Station name
    pub name: String,

    /// Line code
    pub line: String,

    /// How this stop is reached: start, ride, transfer or walk
    pub kind: &'static str,

    /// Length of the hop into this stop (km)
    pub leg_km: f64,
}

/// A planned route.
#[derive(Debug, Serialize)]
pub struct ItineraryResult {
    pub steps: Vec<StepResult>,

    /// Number of hops
    pub connections: usize,

    /// Path cost in the table's cost mode
    pub cost: f64,

    pub distance_km: f64,

    /// Estimated travel time in minutes
    pub travel_minutes: i64,

    pub fare: f64,

    /// Next departure from the origin (HH:MM:SS), when a timetable is loaded
    pub departure: Option<String>,
}

/// Response for route planning.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// Whether the stations are connected
    pub found: bool,

    /// Cost mode the route was planned under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<ItineraryResult>,
}

/// Response after rebuilding the route table.
#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    pub stations: usize,
    pub edges: usize,
    pub mode: &'static str,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StationResult {
    /// Create from a domain Station.
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id().0,
            name: station.name().to_string(),
            line: station.line().to_string(),
            complex: station.complex().0,
            lat: station.position().lat,
            lon: station.position().lon,
        }
    }
}

impl StepResult {
    pub fn from_step(step: &RouteStep) -> Self {
        Self {
            id: step.station.0,
            name: step.name.clone(),
            line: step.line.clone(),
            kind: step.kind.as_str(),
            leg_km: step.leg_km,
        }
    }
}

impl ItineraryResult {
    /// Create from a planned Itinerary.
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        Self {
            steps: itinerary.steps.iter().map(StepResult::from_step).collect(),
            connections: itinerary.connections(),
            cost: itinerary.cost,
            distance_km: itinerary.distance_km,
            travel_minutes: itinerary.travel_minutes,
            fare: itinerary.fare,
            departure: itinerary.departure.map(|t| format_time(&t)),
        }
    }
}

impl RouteResponse {
    pub fn not_found() -> Self {
        Self {
            found: false,
            mode: None,
            route: None,
        }
    }
}

/// Format a time as HH:MM:SS.
fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}
