//! Domain types for the transit route server.
//!
//! Stations are value types identified by an explicit integer key. Nothing
//! in the crate relies on struct identity or implicit hashing of a station;
//! lookups go through `StationId` and the registry's id→position table.

mod error;
mod geo;
mod station;

pub use error::{BuildError, QueryError};
pub use geo::GeoPoint;
pub use station::{ComplexId, DEFAULT_STATION_WEIGHT, Station, StationId};
