//! Edge builder: derives the adjacency relation from the station set.
//!
//! Three independent, additive rules:
//!
//! 1. **Line adjacency** – consecutive stations of the same line (in
//!    registry order) are connected.
//! 2. **Complex adjacency** – every pair of distinct stations sharing a
//!    complex is connected.
//! 3. **Walk adjacency** – nearby stations on different lines and complexes
//!    are connected with a tagged walk edge (see [`crate::walkable`]).
//!
//! All edge weights are in kilometres.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::graph::{Edge, Graph, Neighbor};
use crate::domain::{ComplexId, Station};
use crate::registry::StationSet;
use crate::walkable::WalkableConnections;

/// Both directions of an untagged edge between `a` and `b`.
fn untagged_pair(a: &Station, b: &Station) -> [Edge; 2] {
    let forward = Edge::new(a.id(), b.id(), a.distance_km(b), None);
    [forward, forward.reversed()]
}

/// Rule 1: each line forms a path graph over its stations.
pub fn line_edges(stations: &StationSet) -> Vec<Edge> {
    let mut last_on_line: HashMap<&str, &Station> = HashMap::new();
    let mut edges = Vec::new();

    for station in stations {
        if let Some(previous) = last_on_line.insert(station.line(), station) {
            edges.extend(untagged_pair(previous, station));
        }
    }

    edges
}

/// Rule 2: stations of one complex are pairwise connected.
pub fn complex_edges(stations: &StationSet) -> Vec<Edge> {
    let mut by_complex: HashMap<ComplexId, Vec<&Station>> = HashMap::new();
    for station in stations {
        by_complex.entry(station.complex()).or_default().push(station);
    }

    let mut edges = Vec::new();
    // Iterate in station order so the output is deterministic.
    for (i, a) in stations.iter().enumerate() {
        let members = &by_complex[&a.complex()];
        for b in members.iter().filter(|b| b.id() != a.id()) {
            if stations.index_of(b.id()).is_some_and(|j| j > i) {
                edges.extend(untagged_pair(a, b));
            }
        }
    }

    edges
}

/// Build the full adjacency graph.
///
/// Line and complex edges are deduplicated by (origin, destination); walk
/// edges are added afterwards and never duplicate an existing entry with the
/// same neighbor and tag.
pub fn build_graph(stations: &StationSet, walk_radius_m: f64) -> Graph {
    let mut graph = Graph::with_stations(stations.len());

    let mut seen: HashSet<Edge> = HashSet::new();
    let mut untagged = 0;
    for edge in line_edges(stations)
        .into_iter()
        .chain(complex_edges(stations))
    {
        if seen.insert(edge) && insert_edge(&mut graph, stations, &edge) {
            untagged += 1;
        }
    }

    let walkable = WalkableConnections::discover(stations, walk_radius_m);
    let mut walks = 0;
    for edge in walkable.edges() {
        if insert_edge(&mut graph, stations, &edge) {
            walks += 1;
        }
    }

    debug!(
        stations = stations.len(),
        untagged,
        walk_pairs = walkable.len(),
        walks,
        "Adjacency graph built"
    );

    graph
}

fn insert_edge(graph: &mut Graph, stations: &StationSet, edge: &Edge) -> bool {
    let Some(origin) = stations.index_of(edge.origin) else {
        return false;
    };
    graph.insert(
        origin,
        Neighbor {
            station: edge.destination,
            weight_km: edge.weight_km,
            transfer: edge.transfer,
        },
    )
}
