//! Route planner using all-pairs shortest paths.
//!
//! This module answers: "what is the cheapest way from station A to
//! station B?" for every pair at once. A [`RouteTable`] is computed up front
//! with Floyd–Warshall; each query is then a walk back along the
//! predecessor matrix, optionally annotated into an [`Itinerary`].

mod config;
mod floyd;
mod itinerary;
mod path;
mod table;

#[cfg(test)]
mod floyd_tests;

pub use config::NetworkConfig;
pub use floyd::{DistanceMatrix, PredecessorMatrix, ShortestPaths, UNREACHABLE, floyd_warshall};
pub use itinerary::{Itinerary, RouteStep, StepKind};
pub use path::reconstruct;
pub use table::{DimensionMismatch, RouteTable};
