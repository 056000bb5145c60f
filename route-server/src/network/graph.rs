//! Adjacency structure of the transit graph.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::domain::StationId;

/// Marks an off-line walking connection, encoded as `"<from>|<to>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransferTag {
    pub from: StationId,
    pub to: StationId,
}

impl TransferTag {
    pub fn new(from: StationId, to: StationId) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for TransferTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.from, self.to)
    }
}

/// Error returned when parsing a malformed transfer tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid transfer tag: {0:?}")]
pub struct InvalidTransferTag(pub String);

impl FromStr for TransferTag {
    type Err = InvalidTransferTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once('|')
            .ok_or_else(|| InvalidTransferTag(s.to_string()))?;
        let parse = |part: &str| {
            part.parse::<u32>()
                .map(StationId)
                .map_err(|_| InvalidTransferTag(s.to_string()))
        };
        Ok(Self::new(parse(from)?, parse(to)?))
    }
}

/// A directed connection between two stations.
///
/// Two edges are equal iff their origin and destination match; weight and
/// tag are not part of the identity.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub origin: StationId,
    pub destination: StationId,
    /// Edge weight in kilometres.
    pub weight_km: f64,
    pub transfer: Option<TransferTag>,
}

impl Edge {
    pub fn new(
        origin: StationId,
        destination: StationId,
        weight_km: f64,
        transfer: Option<TransferTag>,
    ) -> Self {
        Self {
            origin,
            destination,
            weight_km,
            transfer,
        }
    }

    /// The same connection in the opposite direction.
    ///
    /// A transfer tag is re-encoded for the new direction.
    pub fn reversed(&self) -> Self {
        Self {
            origin: self.destination,
            destination: self.origin,
            weight_km: self.weight_km,
            transfer: self.transfer.map(|t| TransferTag::new(t.to, t.from)),
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin && self.destination == other.destination
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.origin.hash(state);
        self.destination.hash(state);
    }
}

/// One entry of a station's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub station: StationId,
    /// Edge weight in kilometres.
    pub weight_km: f64,
    pub transfer: Option<TransferTag>,
}

impl Neighbor {
    /// Returns true if this connection is made on foot.
    pub fn is_walk(&self) -> bool {
        self.transfer.is_some()
    }
}

/// Per-station adjacency lists, indexed by station position.
///
/// Every station has exactly one (possibly empty) list. A list never holds
/// two entries for the same neighbor and tag.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    lists: Vec<Vec<Neighbor>>,
    neighbor_ids: Vec<HashSet<StationId>>,
}

impl Graph {
    /// An edgeless graph over `station_count` stations.
    pub fn with_stations(station_count: usize) -> Self {
        Self {
            lists: vec![Vec::new(); station_count],
            neighbor_ids: vec![HashSet::new(); station_count],
        }
    }

    /// Append `neighbor` to the list of the station at `origin`.
    ///
    /// Returns false (and changes nothing) if the list already has an entry
    /// for the same neighbor and tag.
    pub fn insert(&mut self, origin: usize, neighbor: Neighbor) -> bool {
        let list = &mut self.lists[origin];
        if list
            .iter()
            .any(|n| n.station == neighbor.station && n.transfer == neighbor.transfer)
        {
            return false;
        }
        list.push(neighbor);
        self.neighbor_ids[origin].insert(neighbor.station);
        true
    }

    pub fn station_count(&self) -> usize {
        self.lists.len()
    }

    /// Number of directed adjacency entries.
    pub fn edge_count(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    pub fn neighbors(&self, index: usize) -> &[Neighbor] {
        &self.lists[index]
    }

    /// O(1) adjacency test.
    pub fn is_adjacent(&self, index: usize, neighbor: StationId) -> bool {
        self.neighbor_ids[index].contains(&neighbor)
    }

    /// First entry from the station at `index` to `neighbor`, if any.
    pub fn edge(&self, index: usize, neighbor: StationId) -> Option<&Neighbor> {
        if !self.is_adjacent(index, neighbor) {
            return None;
        }
        self.lists[index].iter().find(|n| n.station == neighbor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Neighbor])> + '_ {
        self.lists.iter().enumerate().map(|(i, l)| (i, l.as_slice()))
    }
}
