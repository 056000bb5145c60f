//! Walkable connections between stations.
//!
//! Some stations on different lines are close enough to walk between even
//! though they belong to different complexes (e.g. two entrances across an
//! avenue). These connections don't appear in any line or complex, so they
//! are discovered geometrically and added to the graph as tagged edges.

use std::collections::BTreeMap;

use crate::domain::{Station, StationId};
use crate::network::{Edge, TransferTag};
use crate::registry::StationSet;

/// Default maximum walking distance between two stations.
pub const DEFAULT_WALK_RADIUS_M: f64 = 100.0;

/// A collection of walkable connections between stations.
///
/// Connections are symmetric: if you can walk from A to B, you can walk from B to A
/// over the same distance.
#[derive(Debug, Clone, Default)]
pub struct WalkableConnections {
    /// Map from (from, to) to walking distance in metres.
    /// Stored in both directions; ordered so that edge generation is
    /// deterministic.
    connections: BTreeMap<(StationId, StationId), f64>,
}

impl WalkableConnections {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find every walkable pair in `stations`.
    ///
    /// A pair is walkable when the stations are on different lines, belong to
    /// different complexes, and lie within `radius_m` metres of each other.
    /// This is an O(V²) scan.
    pub fn discover(stations: &StationSet, radius_m: f64) -> Self {
        let mut walkable = Self::new();
        let all = stations.as_slice();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                if let Some(metres) = walk_distance(a, b, radius_m) {
                    walkable.add(a.id(), b.id(), metres);
                }
            }
        }
        walkable
    }

    /// Add a walkable connection between two stations.
    ///
    /// The connection is stored symmetrically (both A→B and B→A).
    pub fn add(&mut self, from: StationId, to: StationId, distance_m: f64) {
        self.connections.insert((from, to), distance_m);
        self.connections.insert((to, from), distance_m);
    }

    /// Returns the number of walkable pairs (counting A→B and B→A as one).
    pub fn len(&self) -> usize {
        self.connections.len() / 2
    }

    /// Returns true if there are no walkable connections.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Directed, tagged graph edges for every connection.
    ///
    /// Each edge is tagged `"<origin>|<destination>"` and weighted in
    /// kilometres, matching the unit of every other edge in the graph.
    pub fn edges(&self) -> Vec<Edge> {
        self.connections
            .iter()
            .map(|(&(from, to), &metres)| {
                Edge::new(from, to, metres / 1000.0, Some(TransferTag::new(from, to)))
            })
            .collect()
    }
}

/// Walking distance in metres if `a` and `b` qualify for a walk edge.
fn walk_distance(a: &Station, b: &Station, radius_m: f64) -> Option<f64> {
    if a.id() == b.id() || a.shares_complex(b) || a.shares_line(b) {
        return None;
    }
    let metres = a.position().distance_m(b.position());
    (metres <= radius_m).then_some(metres)
}
