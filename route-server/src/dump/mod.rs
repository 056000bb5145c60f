//! Line-oriented text persistence for route tables.
//!
//! A snapshot is a directory holding four files:
//!
//! | File | Content |
//! |---|---|
//! | `stations.txt` | every station record, `@`-terminated, on one line |
//! | `graph.txt` | one line per station: its record, then each neighbor record with `;weight;tag` |
//! | `distances.txt` | one line per matrix row, space-separated, `inf` for unreachable |
//! | `predecessors.txt` | one line per matrix row, cells `None` or a station record |
//!
//! A station record is `id;lat;lon;name;line;complex;weight`. Names and line
//! codes containing `;`, `@` or a line break cannot be written.
//!
//! The cost mode is not stored; callers must load a snapshot with the mode
//! it was saved under.

mod record;
mod text;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::domain::{BuildError, StationId};
use crate::network::CostMode;
use crate::planner::{DimensionMismatch, NetworkConfig, RouteTable, ShortestPaths};

pub use record::{decode_station, encode_station};
pub use text::{
    read_distances, read_graph, read_predecessors, read_stations, write_distances, write_graph,
    write_predecessors, write_stations,
};

pub const STATIONS_FILE: &str = "stations.txt";
pub const GRAPH_FILE: &str = "graph.txt";
pub const DISTANCES_FILE: &str = "distances.txt";
pub const PREDECESSORS_FILE: &str = "predecessors.txt";

/// Errors raised while writing or reading dumps.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// A name or line code contains a separator and cannot be written.
    #[error("{field} {value:?} contains a reserved character")]
    ReservedCharacter { field: &'static str, value: String },

    /// A dump line could not be parsed.
    #[error("malformed dump at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// A record references a station that is not in the station set.
    #[error("unknown station {0}")]
    UnknownStation(StationId),

    /// A file has a different number of rows than there are stations.
    #[error("{file} has {found} rows, expected {expected}")]
    Dimension {
        file: &'static str,
        expected: usize,
        found: usize,
    },

    /// A matrix file is not square.
    #[error("{0} matrix is not square")]
    NotSquare(&'static str),

    #[error(transparent)]
    Mismatch(#[from] DimensionMismatch),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DumpError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        DumpError::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

/// Returns true if `dir` holds all four snapshot files.
pub fn snapshot_exists(dir: &Path) -> bool {
    [STATIONS_FILE, GRAPH_FILE, DISTANCES_FILE, PREDECESSORS_FILE]
        .iter()
        .all(|name| dir.join(name).is_file())
}

/// Write `table` into `dir`, creating the directory if needed.
pub fn save_snapshot(dir: &Path, table: &RouteTable) -> Result<(), DumpError> {
    std::fs::create_dir_all(dir)?;
    let stations = table.stations();

    with_writer(&dir.join(STATIONS_FILE), |w| write_stations(w, stations))?;
    with_writer(&dir.join(GRAPH_FILE), |w| write_graph(w, stations, table.graph()))?;
    with_writer(&dir.join(DISTANCES_FILE), |w| {
        write_distances(w, &table.paths().distances)
    })?;
    with_writer(&dir.join(PREDECESSORS_FILE), |w| {
        write_predecessors(w, stations, &table.paths().predecessors)
    })?;

    info!(
        dir = %dir.display(),
        stations = stations.len(),
        "Saved route table snapshot"
    );
    Ok(())
}

/// Restore a table saved with [`save_snapshot`].
pub fn load_snapshot(
    dir: &Path,
    config: NetworkConfig,
    mode: CostMode,
) -> Result<RouteTable, DumpError> {
    let stations = read_stations(open(&dir.join(STATIONS_FILE))?)?;
    let graph = read_graph(open(&dir.join(GRAPH_FILE))?, &stations)?;
    let distances = read_distances(open(&dir.join(DISTANCES_FILE))?)?;
    let predecessors = read_predecessors(open(&dir.join(PREDECESSORS_FILE))?, &stations)?;

    let paths = ShortestPaths {
        distances,
        predecessors,
        mode,
    };
    let table = RouteTable::from_parts(stations, graph, paths, config)?;

    info!(
        dir = %dir.display(),
        stations = table.stations().len(),
        mode = %mode,
        "Loaded route table snapshot"
    );
    Ok(table)
}

fn open(path: &Path) -> Result<BufReader<File>, DumpError> {
    Ok(BufReader::new(File::open(path)?))
}

fn with_writer<F>(path: &Path, write: F) -> Result<(), DumpError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), DumpError>,
{
    let mut out = BufWriter::new(File::create(path)?);
    write(&mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComplexId, GeoPoint, Station};
    use crate::registry::StationSet;
    use std::io::Cursor;

    fn station(id: u32, lat: f64, line: &str, complex: u32) -> Station {
        Station::new(
            StationId(id),
            GeoPoint::new(lat, -73.98),
            format!("Station {id}"),
            line,
            ComplexId(complex),
            0.000072,
        )
    }

    /// A line, a complex transfer, a walk and an isolated station.
    fn sample_table() -> RouteTable {
        let stations = StationSet::from_stations(vec![
            station(1, 40.740, "1", 10),
            station(2, 40.750, "1", 20),
            station(3, 40.750, "N", 20),
            station(4, 40.75045, "7", 30),
            station(5, 41.500, "G", 40),
        ])
        .unwrap();
        RouteTable::from_stations(stations, NetworkConfig::default(), CostMode::Distance)
    }

    #[test]
    fn snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample_table();

        assert!(!snapshot_exists(dir.path()));
        save_snapshot(dir.path(), &table).unwrap();
        assert!(snapshot_exists(dir.path()));

        let loaded = load_snapshot(dir.path(), NetworkConfig::default(), CostMode::Distance).unwrap();

        assert_eq!(loaded.stations().as_slice(), table.stations().as_slice());
        for i in 0..table.stations().len() {
            assert_eq!(loaded.graph().neighbors(i), table.graph().neighbors(i));
        }
        assert_eq!(loaded.paths(), table.paths());
        assert_eq!(
            loaded.shortest_path(StationId(1), StationId(4)).unwrap(),
            table.shortest_path(StationId(1), StationId(4)).unwrap()
        );
    }

    #[test]
    fn stations_file_layout() {
        let table = sample_table();
        let mut out = Vec::new();
        write_stations(&mut out, table.stations()).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("1;40.74;-73.98;Station 1;1;10;0.000072@2;"));
        assert!(text.ends_with("@\n"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn graph_file_layout() {
        let table = sample_table();
        let mut out = Vec::new();
        write_graph(&mut out, table.stations(), table.graph()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        // Isolated station: own record only.
        assert_eq!(lines[4], "5;41.5;-73.98;Station 5;G;40;0.000072@");
        // Station 3 walks to 4 with a tagged edge.
        assert!(lines[2].contains(";Station 4;7;30;0.000072;0.0"));
        assert!(lines[2].contains(";3|4@"));
        // Line hop from 1 to 2 is untagged.
        assert!(lines[0].contains(";None@"));
    }

    #[test]
    fn distances_and_predecessors_layout() {
        let table = sample_table();

        let mut out = Vec::new();
        write_distances(&mut out, &table.paths().distances).unwrap();
        let text = String::from_utf8(out).unwrap();
        let first: Vec<_> = text.lines().next().unwrap().split(' ').collect();
        assert_eq!(first.len(), 5);
        assert_eq!(first[0], "0");
        assert_eq!(first[4], "inf");

        let mut out = Vec::new();
        write_predecessors(&mut out, table.stations(), &table.paths().predecessors).unwrap();
        let text = String::from_utf8(out).unwrap();
        let last_row = text.lines().last().unwrap();
        assert_eq!(
            last_row,
            "None@None@None@None@5;41.5;-73.98;Station 5;G;40;0.000072@"
        );
    }

    #[test]
    fn reserved_characters_fail_the_write() {
        let stations = StationSet::from_stations(vec![Station::new(
            StationId(1),
            GeoPoint::new(40.7, -73.9),
            "Bad;Name",
            "1",
            ComplexId(1),
            0.0,
        )])
        .unwrap();

        let err = write_stations(Vec::new(), &stations).unwrap_err();
        assert!(matches!(err, DumpError::ReservedCharacter { field: "name", .. }));
    }

    #[test]
    fn malformed_lines_report_position() {
        let dump = "1;40.7;-73.9;A;1;1;0@\n";
        let stations = read_stations(Cursor::new(dump)).unwrap();

        let err = read_distances(Cursor::new("0 1\nx 0\n")).unwrap_err();
        assert!(matches!(err, DumpError::Malformed { line: 2, .. }));

        let err = read_graph(Cursor::new("1;40.7;-73.9;A;1;1;0@9;40.7;-73.9;B;1;2;0;0.5@\n"), &stations)
            .unwrap_err();
        assert!(matches!(err, DumpError::Malformed { line: 1, .. }));

        let err = read_graph(Cursor::new("1;40.7;-73.9;A;1;1;0@9;40.7;-73.9;B;1;2;0;0.5;None@\n"), &stations)
            .unwrap_err();
        assert!(matches!(err, DumpError::UnknownStation(StationId(9))));
    }

    #[test]
    fn ragged_matrices_are_rejected() {
        let err = read_distances(Cursor::new("0 1\n1\n")).unwrap_err();
        assert!(matches!(err, DumpError::NotSquare("distances")));
    }

    #[test]
    fn mismatched_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        save_snapshot(dir.path(), &sample_table()).unwrap();
        std::fs::write(dir.path().join(DISTANCES_FILE), "0\n").unwrap();

        let err = load_snapshot(dir.path(), NetworkConfig::default(), CostMode::Distance)
            .unwrap_err();
        assert!(matches!(err, DumpError::Mismatch(_)));
    }

    #[test]
    fn missing_snapshot_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_snapshot(dir.path(), NetworkConfig::default(), CostMode::Distance)
            .unwrap_err();
        assert!(matches!(err, DumpError::Io(_)));
    }
}
