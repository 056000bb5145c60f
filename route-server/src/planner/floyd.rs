//! All-pairs shortest paths (Floyd–Warshall) with predecessor tracking.
//!
//! # Matrices
//!
//! Both matrices are flat, row-major `n × n` buffers addressed by station
//! position (see [`StationSet::index_of`]):
//!
//! - [`DistanceMatrix`] stores path costs. Unreachable cells hold
//!   [`UNREACHABLE`], a finite sentinel that dominates any real cost and can
//!   be added to itself without overflowing. Callers see it as `None`.
//! - [`PredecessorMatrix`] stores, for row `i`, the position of the station
//!   directly before `j` on the shortest path from `i` to `j`. The diagonal
//!   holds the station itself.
//!
//! # Algorithm
//!
//! Classic k-outermost relaxation. Edge costs are symmetric, so every
//! improvement of `d[i][j]` is mirrored into `d[j][i]` together with the
//! matching predecessor. Relaxation uses a strict `<`, which together with
//! non-negative costs keeps every predecessor chain acyclic.

use std::time::Instant;

use tracing::{debug, info};

use crate::network::{CostMode, Graph};
use crate::registry::StationSet;

/// Sentinel cost for unreachable pairs.
pub const UNREACHABLE: f64 = f64::MAX / 4.0;

/// Square matrix of shortest-path costs.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// A matrix where every pair is unreachable.
    pub fn unreachable(size: usize) -> Self {
        Self {
            size,
            cells: vec![UNREACHABLE; size * size],
        }
    }

    /// Assemble a matrix from rows, e.g. when reading a dump.
    ///
    /// Returns `None` unless every row has exactly `rows.len()` cells.
    /// Non-finite or sentinel-sized values are stored as unreachable.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            if row.len() != size {
                return None;
            }
            cells.extend(
                row.into_iter()
                    .map(|v| if v.is_finite() && v < UNREACHABLE { v } else { UNREACHABLE }),
            );
        }
        Some(Self { size, cells })
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cost from position `i` to position `j`, or `None` if unreachable.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let value = self.raw(i, j);
        (value < UNREACHABLE).then_some(value)
    }

    /// Raw cell value, including the sentinel.
    pub fn raw(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.size + j]
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks(0) panics, an empty matrix has no rows anyway
        self.cells.chunks(self.size.max(1))
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        self.cells[i * self.size + j] = value;
    }
}

/// Square matrix of direct predecessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredecessorMatrix {
    size: usize,
    cells: Vec<Option<u32>>,
}

impl PredecessorMatrix {
    /// A matrix with no predecessors at all.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Assemble a matrix from rows of positions.
    ///
    /// Returns `None` unless the rows form a square and every position is
    /// in range.
    pub fn from_rows(rows: Vec<Vec<Option<usize>>>) -> Option<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            if row.len() != size {
                return None;
            }
            for cell in row {
                match cell {
                    Some(p) if p >= size => return None,
                    Some(p) => cells.push(Some(u32::try_from(p).ok()?)),
                    None => cells.push(None),
                }
            }
        }
        Some(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Position of the station before `j` on the path from `i`.
    pub fn get(&self, i: usize, j: usize) -> Option<usize> {
        self.cells[i * self.size + j].map(|p| p as usize)
    }

    /// Iterate over rows as slices of positions.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<u32>]> + '_ {
        self.cells.chunks(self.size.max(1))
    }

    fn set(&mut self, i: usize, j: usize, value: Option<u32>) {
        self.cells[i * self.size + j] = value;
    }
}

/// Output of a Floyd–Warshall pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    pub distances: DistanceMatrix,
    pub predecessors: PredecessorMatrix,
    /// Cost mode the distances were computed under.
    pub mode: CostMode,
}

impl ShortestPaths {
    pub fn size(&self) -> usize {
        self.distances.size()
    }
}

/// Compute all-pairs shortest paths over `graph`.
///
/// `graph` must have been built from `stations`; neighbors whose id is not
/// in the set are ignored.
pub fn floyd_warshall(stations: &StationSet, graph: &Graph, mode: CostMode) -> ShortestPaths {
    let started = Instant::now();
    let n = stations.len();

    let mut dist = DistanceMatrix::unreachable(n);
    let mut pred = PredecessorMatrix::empty(n);

    for i in 0..n {
        dist.set(i, i, 0.0);
        pred.set(i, i, Some(i as u32));
    }

    for (i, neighbors) in graph.iter().take(n) {
        let origin = &stations[i];
        for neighbor in neighbors {
            let Some(j) = stations.index_of(neighbor.station) else {
                debug!(origin = %origin.id(), neighbor = %neighbor.station, "Skipping unknown neighbor");
                continue;
            };
            if i == j {
                continue;
            }
            let cost = mode.edge_cost(origin, &stations[j], neighbor.weight_km);
            if cost < dist.raw(i, j) {
                dist.set(i, j, cost);
                dist.set(j, i, cost);
                pred.set(i, j, Some(i as u32));
                pred.set(j, i, Some(j as u32));
            }
        }
    }

    relax(&mut dist, &mut pred);

    info!(
        stations = n,
        edges = graph.edge_count(),
        mode = %mode,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Computed all-pairs shortest paths"
    );

    ShortestPaths {
        distances: dist,
        predecessors: pred,
        mode,
    }
}

/// The O(n³) core. Works directly on the flat buffers.
fn relax(dist: &mut DistanceMatrix, pred: &mut PredecessorMatrix) {
    let n = dist.size;
    let d = &mut dist.cells;
    let p = &mut pred.cells;

    for k in 0..n {
        for i in 0..n {
            let d_ik = d[i * n + k];
            if d_ik >= UNREACHABLE {
                continue;
            }
            for j in 0..n {
                let d_kj = d[k * n + j];
                if d_kj >= UNREACHABLE {
                    continue;
                }
                let candidate = d_ik + d_kj;
                if candidate < d[i * n + j] {
                    d[i * n + j] = candidate;
                    d[j * n + i] = candidate;
                    p[i * n + j] = p[k * n + j];
                    p[j * n + i] = p[k * n + i];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_does_not_overflow() {
        let sum = UNREACHABLE + UNREACHABLE;
        assert!(sum.is_finite());
        assert!(sum > UNREACHABLE);
    }

    #[test]
    fn distance_matrix_accessors() {
        let m = DistanceMatrix::from_rows(vec![vec![0.0, 1.5], vec![1.5, f64::INFINITY]]).unwrap();
        assert_eq!(m.size(), 2);
        assert_eq!(m.get(0, 1), Some(1.5));
        assert_eq!(m.get(1, 1), None);
        assert_eq!(m.raw(1, 1), UNREACHABLE);
        assert_eq!(m.rows().count(), 2);
    }

    #[test]
    fn from_rows_rejects_ragged() {
        assert!(DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![0.0]]).is_none());
        assert!(PredecessorMatrix::from_rows(vec![vec![Some(0)], vec![None]]).is_none());
        assert!(PredecessorMatrix::from_rows(vec![vec![Some(3)]]).is_none());
    }

    #[test]
    fn empty_matrices() {
        let m = DistanceMatrix::unreachable(0);
        assert_eq!(m.rows().count(), 0);
        let p = PredecessorMatrix::empty(0);
        assert_eq!(p.rows().count(), 0);
    }

    #[test]
    fn relax_chain() {
        // 0 - 1 - 2 with unit costs
        let mut dist = DistanceMatrix::unreachable(3);
        let mut pred = PredecessorMatrix::empty(3);
        for i in 0..3 {
            dist.set(i, i, 0.0);
            pred.set(i, i, Some(i as u32));
        }
        for (a, b) in [(0, 1), (1, 2)] {
            dist.set(a, b, 1.0);
            dist.set(b, a, 1.0);
            pred.set(a, b, Some(a as u32));
            pred.set(b, a, Some(b as u32));
        }

        relax(&mut dist, &mut pred);

        assert_eq!(dist.get(0, 2), Some(2.0));
        assert_eq!(dist.get(2, 0), Some(2.0));
        assert_eq!(pred.get(0, 2), Some(1));
        assert_eq!(pred.get(2, 0), Some(1));
        assert_eq!(pred.get(0, 1), Some(0));
    }
}
