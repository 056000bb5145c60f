//! The frozen route table served to queries.

use std::time::Instant;

use tracing::info;

use super::floyd::{ShortestPaths, floyd_warshall};
use super::itinerary::Itinerary;
use super::path::reconstruct;
use super::NetworkConfig;
use crate::domain::{BuildError, QueryError, Station, StationId};
use crate::network::{CostMode, Graph, build_graph};
use crate::registry::{RawStation, StationSet, build_stations};

/// Error returned when persisted parts don't describe the same network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{part} covers {found} stations but the station set has {expected}")]
pub struct DimensionMismatch {
    pub part: &'static str,
    pub expected: usize,
    pub found: usize,
}

/// Stations, adjacency and shortest-path matrices for one dataset.
///
/// Built once and never mutated; share it behind an `Arc` and replace it
/// wholesale when the data changes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    stations: StationSet,
    graph: Graph,
    paths: ShortestPaths,
    config: NetworkConfig,
}

impl RouteTable {
    /// Run the whole pipeline over raw records.
    ///
    /// The first malformed record aborts the build.
    pub fn build(
        records: &[RawStation],
        config: NetworkConfig,
        mode: CostMode,
    ) -> Result<Self, BuildError> {
        let stations = build_stations(records, config.start_id, config.default_weight)?;
        Ok(Self::from_stations(stations, config, mode))
    }

    /// Build the graph and matrices for an already-registered station set.
    pub fn from_stations(stations: StationSet, config: NetworkConfig, mode: CostMode) -> Self {
        let started = Instant::now();
        let graph = build_graph(&stations, config.walk_radius_m);
        let paths = floyd_warshall(&stations, &graph, mode);
        info!(
            stations = stations.len(),
            edges = graph.edge_count(),
            mode = %mode,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Route table built"
        );
        Self {
            stations,
            graph,
            paths,
            config,
        }
    }

    /// Reassemble a table from persisted parts.
    pub fn from_parts(
        stations: StationSet,
        graph: Graph,
        paths: ShortestPaths,
        config: NetworkConfig,
    ) -> Result<Self, DimensionMismatch> {
        let expected = stations.len();
        let check = |part: &'static str, found: usize| {
            if found == expected {
                Ok(())
            } else {
                Err(DimensionMismatch {
                    part,
                    expected,
                    found,
                })
            }
        };
        check("graph", graph.station_count())?;
        check("distance matrix", paths.distances.size())?;
        check("predecessor matrix", paths.predecessors.size())?;

        Ok(Self {
            stations,
            graph,
            paths,
            config,
        })
    }

    /// Ordered station ids from `origin` to `destination`; empty when
    /// unreachable.
    pub fn shortest_path(
        &self,
        origin: StationId,
        destination: StationId,
    ) -> Result<Vec<StationId>, QueryError> {
        reconstruct(&self.stations, &self.paths.predecessors, origin, destination)
    }

    /// Shortest-path cost, or `None` when unreachable.
    pub fn distance(
        &self,
        origin: StationId,
        destination: StationId,
    ) -> Result<Option<f64>, QueryError> {
        let i = self
            .stations
            .index_of(origin)
            .ok_or(QueryError::StationNotFound(origin))?;
        let j = self
            .stations
            .index_of(destination)
            .ok_or(QueryError::StationNotFound(destination))?;
        Ok(self.paths.distances.get(i, j))
    }

    /// Shortest route as an annotated itinerary; `None` when unreachable.
    pub fn plan(
        &self,
        origin: StationId,
        destination: StationId,
    ) -> Result<Option<Itinerary>, QueryError> {
        let path = self.shortest_path(origin, destination)?;
        let Some(cost) = self.distance(origin, destination)? else {
            return Ok(None);
        };
        Ok(Itinerary::from_path(
            &path,
            &self.stations,
            &self.graph,
            cost,
            &self.config,
        ))
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn stations(&self) -> &StationSet {
        &self.stations
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn paths(&self) -> &ShortestPaths {
        &self.paths
    }

    pub fn mode(&self) -> CostMode {
        self.paths.mode
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::floyd::{DistanceMatrix, PredecessorMatrix};

    fn raw(lat: &str, name: &str, line: &str, complex: &str) -> RawStation {
        RawStation::new(lat, "-73.98", name, line, complex)
    }

    fn records() -> Vec<RawStation> {
        vec![
            raw("40.70", "A", "1", "1"),
            raw("40.71", "B", "1", "2"),
            raw("40.72", "C", "1", "3"),
            raw("40.80", "D", "N", "4"),
        ]
    }

    #[test]
    fn build_and_query() {
        let table =
            RouteTable::build(&records(), NetworkConfig::default(), CostMode::Distance).unwrap();

        assert_eq!(table.stations().len(), 4);
        assert_eq!(table.mode(), CostMode::Distance);

        let path = table.shortest_path(StationId(1), StationId(3)).unwrap();
        assert_eq!(path, vec![StationId(1), StationId(2), StationId(3)]);

        let itinerary = table.plan(StationId(1), StationId(3)).unwrap().unwrap();
        assert_eq!(itinerary.connections(), 2);
        let cost = table.distance(StationId(1), StationId(3)).unwrap().unwrap();
        assert_eq!(itinerary.cost, cost);
    }

    #[test]
    fn disconnected_station_has_no_plan() {
        let table =
            RouteTable::build(&records(), NetworkConfig::default(), CostMode::Distance).unwrap();

        assert_eq!(table.distance(StationId(1), StationId(4)), Ok(None));
        assert!(table.shortest_path(StationId(1), StationId(4)).unwrap().is_empty());
        assert_eq!(table.plan(StationId(1), StationId(4)), Ok(None));
    }

    #[test]
    fn unknown_station_is_query_error() {
        let table =
            RouteTable::build(&records(), NetworkConfig::default(), CostMode::Distance).unwrap();
        assert_eq!(
            table.plan(StationId(1), StationId(42)),
            Err(QueryError::StationNotFound(StationId(42)))
        );
    }

    #[test]
    fn malformed_record_aborts_build() {
        let mut records = records();
        records.push(raw("north", "E", "1", "5"));
        let err = RouteTable::build(&records, NetworkConfig::default(), CostMode::Distance)
            .unwrap_err();
        assert!(matches!(err, BuildError::MalformedRecord { row: 5, .. }));
    }

    #[test]
    fn from_parts_checks_dimensions() {
        let table =
            RouteTable::build(&records(), NetworkConfig::default(), CostMode::Distance).unwrap();

        let paths = ShortestPaths {
            distances: DistanceMatrix::unreachable(3),
            predecessors: PredecessorMatrix::empty(4),
            mode: CostMode::Distance,
        };
        let err = RouteTable::from_parts(
            table.stations().clone(),
            table.graph().clone(),
            paths,
            NetworkConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.part, "distance matrix");
        assert_eq!(err.found, 3);

        let rebuilt = RouteTable::from_parts(
            table.stations().clone(),
            table.graph().clone(),
            table.paths().clone(),
            NetworkConfig::default(),
        )
        .unwrap();
        assert_eq!(rebuilt.paths(), table.paths());
    }
}
