//! Annotated routes built from a reconstructed station path.

use chrono::NaiveTime;

use super::NetworkConfig;
use crate::domain::{ComplexId, Station, StationId};
use crate::network::Graph;
use crate::registry::StationSet;
use crate::schedule::DepartureOracle;

/// How a step of an itinerary is reached from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// The origin.
    Start,
    /// A hop along a line.
    Ride,
    /// A free change between platforms of one complex.
    Transfer,
    /// A walk between nearby stations outside any complex.
    Walk,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Start => "start",
            StepKind::Ride => "ride",
            StepKind::Transfer => "transfer",
            StepKind::Walk => "walk",
        }
    }
}

/// One station on an itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStep {
    pub station: StationId,
    pub name: String,
    pub line: String,
    pub complex: ComplexId,
    pub kind: StepKind,
    /// Length of the hop into this station (km). Zero for the origin.
    pub leg_km: f64,
}

impl RouteStep {
    fn new(station: &Station, kind: StepKind, leg_km: f64) -> Self {
        Self {
            station: station.id(),
            name: station.name().to_string(),
            line: station.line().to_string(),
            complex: station.complex(),
            kind,
            leg_km,
        }
    }
}

/// A shortest route with travel estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub steps: Vec<RouteStep>,
    /// Path cost from the distance matrix, in the table's cost mode.
    pub cost: f64,
    /// Sum of edge lengths along the path.
    pub distance_km: f64,
    pub travel_minutes: i64,
    pub fare: f64,
    /// Next departure from the origin, when a timetable was consulted.
    pub departure: Option<NaiveTime>,
}

impl Itinerary {
    /// Annotate `path`. Returns `None` for an empty path.
    ///
    /// Every id in `path` must belong to `stations`.
    pub fn from_path(
        path: &[StationId],
        stations: &StationSet,
        graph: &Graph,
        cost: f64,
        config: &NetworkConfig,
    ) -> Option<Self> {
        let (&first, rest) = path.split_first()?;
        let mut previous = stations.index_of(first)?;
        let mut steps = vec![RouteStep::new(&stations[previous], StepKind::Start, 0.0)];
        let mut distance_km = 0.0;

        for &id in rest {
            let current = stations.index_of(id)?;
            let (from, to) = (&stations[previous], &stations[current]);

            let (kind, leg_km) = match graph.edge(previous, id) {
                Some(edge) if edge.is_walk() => (StepKind::Walk, edge.weight_km),
                Some(edge) if from.shares_complex(to) => (StepKind::Transfer, edge.weight_km),
                Some(edge) => (StepKind::Ride, edge.weight_km),
                None if from.shares_complex(to) => (StepKind::Transfer, from.distance_km(to)),
                None => (StepKind::Ride, from.distance_km(to)),
            };

            distance_km += leg_km;
            steps.push(RouteStep::new(to, kind, leg_km));
            previous = current;
        }

        Some(Self {
            steps,
            cost,
            distance_km,
            travel_minutes: config.travel_minutes(distance_km),
            fare: config.fare,
            departure: None,
        })
    }

    /// Number of hops (stations minus one).
    pub fn connections(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn origin(&self) -> &RouteStep {
        &self.steps[0]
    }

    pub fn destination(&self) -> &RouteStep {
        &self.steps[self.steps.len() - 1]
    }

    /// Returns true if any hop is made on foot.
    pub fn has_walk(&self) -> bool {
        self.steps.iter().any(|s| s.kind == StepKind::Walk)
    }

    /// Look up the next departure from the origin, leaving at `reference`.
    pub fn with_departure<O>(mut self, oracle: &O, reference: NaiveTime) -> Self
    where
        O: DepartureOracle + ?Sized,
    {
        let travel = chrono::Duration::minutes(self.travel_minutes);
        let origin = self.origin();
        let departure = oracle.next_departure(&origin.line, &origin.name, reference, travel);
        self.departure = Some(departure);
        self
    }
}
