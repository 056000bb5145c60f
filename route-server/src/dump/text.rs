//! Writers and readers for the four dump files.

use std::io::{BufRead, Write};

use super::DumpError;
use super::record::{FIELD_SEP, RECORD_SEP, decode_id, decode_station, encode_station, records};
use crate::network::{Graph, Neighbor, TransferTag};
use crate::planner::{DistanceMatrix, PredecessorMatrix};
use crate::registry::StationSet;

const NO_TAG: &str = "None";
const NO_PREDECESSOR: &str = "None";
const UNREACHABLE_TEXT: &str = "inf";

/// Write all stations as one `@`-terminated record line.
pub fn write_stations<W: Write>(mut out: W, stations: &StationSet) -> Result<(), DumpError> {
    let mut line = String::new();
    for station in stations {
        encode_station(&mut line, station)?;
        line.push(RECORD_SEP);
    }
    writeln!(out, "{line}")?;
    Ok(())
}

/// Read a station set written by [`write_stations`].
pub fn read_stations<R: BufRead>(input: R) -> Result<StationSet, DumpError> {
    let mut stations = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        for record in records(&line) {
            let (station, rest) = decode_station(record, i + 1)?;
            if !rest.is_empty() {
                return Err(DumpError::malformed(i + 1, "unexpected trailing fields"));
            }
            stations.push(station);
        }
    }
    Ok(StationSet::from_stations(stations)?)
}

/// Write one adjacency line per station.
pub fn write_graph<W: Write>(
    mut out: W,
    stations: &StationSet,
    graph: &Graph,
) -> Result<(), DumpError> {
    for (index, neighbors) in graph.iter() {
        let mut line = String::new();
        encode_station(&mut line, &stations[index])?;
        line.push(RECORD_SEP);
        for neighbor in neighbors {
            let station = stations
                .get(neighbor.station)
                .ok_or(DumpError::UnknownStation(neighbor.station))?;
            encode_station(&mut line, station)?;
            let tag = neighbor
                .transfer
                .map_or_else(|| NO_TAG.to_string(), |t| t.to_string());
            line.push_str(&format!("{FIELD_SEP}{}{FIELD_SEP}{tag}", neighbor.weight_km));
            line.push(RECORD_SEP);
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Read an adjacency dump. Line `k` must describe the `k`-th station.
pub fn read_graph<R: BufRead>(input: R, stations: &StationSet) -> Result<Graph, DumpError> {
    let mut graph = Graph::with_stations(stations.len());
    let mut rows = 0;

    for (i, line) in input.lines().enumerate() {
        let line = line?;
        let number = i + 1;
        let mut parts = records(&line);
        let Some(own) = parts.next() else {
            return Err(DumpError::malformed(number, "missing station record"));
        };

        let id = decode_id(own, number)?;
        if stations.index_of(id) != Some(i) {
            return Err(DumpError::malformed(
                number,
                format!("station {id} is out of order or unknown"),
            ));
        }

        for record in parts {
            let neighbor = decode_neighbor(record, number, stations)?;
            graph.insert(i, neighbor);
        }
        rows += 1;
    }

    if rows != stations.len() {
        return Err(DumpError::Dimension {
            file: "graph",
            expected: stations.len(),
            found: rows,
        });
    }
    Ok(graph)
}

fn decode_neighbor(record: &str, line: usize, stations: &StationSet) -> Result<Neighbor, DumpError> {
    let (station, rest) = decode_station(record, line)?;
    let [weight, tag] = rest.as_slice() else {
        return Err(DumpError::malformed(
            line,
            format!("neighbor record needs weight and tag: {record:?}"),
        ));
    };
    if !stations.contains(station.id()) {
        return Err(DumpError::UnknownStation(station.id()));
    }

    let weight_km: f64 = weight
        .parse()
        .map_err(|_| DumpError::malformed(line, format!("invalid weight: {weight:?}")))?;
    let transfer = match *tag {
        NO_TAG => None,
        text => Some(
            text.parse::<TransferTag>()
                .map_err(|e| DumpError::malformed(line, e.to_string()))?,
        ),
    };

    Ok(Neighbor {
        station: station.id(),
        weight_km,
        transfer,
    })
}

/// Write one line per row; each cell is `None` or a full station record.
pub fn write_predecessors<W: Write>(
    mut out: W,
    stations: &StationSet,
    predecessors: &PredecessorMatrix,
) -> Result<(), DumpError> {
    let n = predecessors.size();
    for i in 0..n {
        let mut line = String::new();
        for j in 0..n {
            match predecessors.get(i, j) {
                Some(p) => encode_station(&mut line, &stations[p])?,
                None => line.push_str(NO_PREDECESSOR),
            }
            line.push(RECORD_SEP);
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Read a predecessor dump, resolving each record back to its position.
pub fn read_predecessors<R: BufRead>(
    input: R,
    stations: &StationSet,
) -> Result<PredecessorMatrix, DumpError> {
    let mut rows = Vec::with_capacity(stations.len());
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        let row = records(&line)
            .map(|cell| match cell {
                NO_PREDECESSOR => Ok(None),
                record => {
                    let id = decode_id(record, i + 1)?;
                    stations
                        .index_of(id)
                        .map(Some)
                        .ok_or(DumpError::UnknownStation(id))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    PredecessorMatrix::from_rows(rows).ok_or(DumpError::NotSquare("predecessors"))
}

/// Write one line per row of space-separated costs; unreachable is `inf`.
pub fn write_distances<W: Write>(mut out: W, distances: &DistanceMatrix) -> Result<(), DumpError> {
    let n = distances.size();
    for i in 0..n {
        let row: Vec<String> = (0..n)
            .map(|j| match distances.get(i, j) {
                Some(v) => v.to_string(),
                None => UNREACHABLE_TEXT.to_string(),
            })
            .collect();
        writeln!(out, "{}", row.join(" "))?;
    }
    Ok(())
}

/// Read a distance dump written by [`write_distances`].
pub fn read_distances<R: BufRead>(input: R) -> Result<DistanceMatrix, DumpError> {
    let mut rows = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        let row = line
            .split_whitespace()
            .map(|cell| {
                cell.parse::<f64>()
                    .map_err(|_| DumpError::malformed(i + 1, format!("invalid distance: {cell:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    DistanceMatrix::from_rows(rows).ok_or(DumpError::NotSquare("distances"))
}
