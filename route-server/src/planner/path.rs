//! Path reconstruction from a predecessor matrix.

use tracing::{debug, error, warn};

use super::floyd::PredecessorMatrix;
use crate::domain::{QueryError, StationId};
use crate::registry::StationSet;

/// Rebuild the ordered station path from `origin` to `destination`.
///
/// Returns:
/// - `Ok(vec![origin])` when origin and destination coincide,
/// - `Ok(vec![])` when the destination is unreachable, or when the
///   predecessor chain stops short of the origin,
/// - `Err(QueryError::StationNotFound)` when either id is unknown,
/// - `Err(QueryError::CycleGuardTripped)` when the chain revisits a station.
pub fn reconstruct(
    stations: &StationSet,
    predecessors: &PredecessorMatrix,
    origin: StationId,
    destination: StationId,
) -> Result<Vec<StationId>, QueryError> {
    let i = stations
        .index_of(origin)
        .ok_or(QueryError::StationNotFound(origin))?;
    let j = stations
        .index_of(destination)
        .ok_or(QueryError::StationNotFound(destination))?;

    if i == j {
        return Ok(vec![origin]);
    }

    if predecessors.get(i, j).is_none() {
        debug!(%origin, %destination, "No path");
        return Ok(Vec::new());
    }

    let n = stations.len();
    let mut visited = vec![false; n];
    let mut reversed = vec![j];
    visited[j] = true;

    let mut current = j;
    while current != i {
        let Some(previous) = predecessors.get(i, current) else {
            warn!(
                %origin,
                %destination,
                at = %stations[current].id(),
                "Predecessor chain is incomplete"
            );
            return Ok(Vec::new());
        };

        if previous >= n || visited[previous] || reversed.len() > n {
            let steps = reversed.len();
            error!(%origin, %destination, steps, "Predecessor chain cycles");
            return Err(QueryError::CycleGuardTripped {
                origin,
                destination,
                steps,
            });
        }

        visited[previous] = true;
        reversed.push(previous);
        current = previous;
    }

    Ok(reversed
        .into_iter()
        .rev()
        .map(|index| stations[index].id())
        .collect())
}
