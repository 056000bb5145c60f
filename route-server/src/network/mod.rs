//! Transit graph construction.
//!
//! Turns a registered [`StationSet`](crate::registry::StationSet) into an
//! adjacency [`Graph`] and defines how its edges are costed.

mod cost;
mod edges;
mod graph;

pub use cost::{CostMode, FactorWeights, InvalidCostMode, calc_factor};
pub use edges::{build_graph, complex_edges, line_edges};
pub use graph::{Edge, Graph, InvalidTransferTag, Neighbor, TransferTag};
