//! CSV-backed timetable.
//!
//! # CSV format
//!
//! ```csv
//! line,station,departure
//! 1,Times Sq-42 St,08:05:00
//! 1,Times Sq-42 St,24:10:00
//! ```
//!
//! Hours of 24 and above wrap around midnight, as in GTFS stop times.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveTime};
use serde::Deserialize;
use tracing::info;

use super::DepartureOracle;

/// Errors raised while loading a timetable.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The timetable file does not exist.
    #[error("timetable not found: {}", .0.display())]
    Missing(PathBuf),

    /// A departure time could not be parsed.
    #[error("invalid departure time at row {row}: {value:?}")]
    Parse { row: usize, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct TimetableRow {
    line: String,
    station: String,
    departure: String,
}

/// Sorted departures per (line, station).
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    departures: HashMap<(String, String), Vec<NaiveTime>>,
}

impl Timetable {
    /// Load a timetable from a CSV file.
    pub fn load(path: &Path) -> Result<Self, ScheduleError> {
        if !path.exists() {
            return Err(ScheduleError::Missing(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        let timetable = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            departures = timetable.len(),
            "Loaded timetable"
        );
        Ok(timetable)
    }

    /// Like [`Timetable::load`] but accepts any `Read` source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScheduleError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut timetable = Self::default();
        for (i, result) in csv_reader.deserialize::<TimetableRow>().enumerate() {
            let row = result?;
            let time = parse_departure(&row.departure).ok_or_else(|| ScheduleError::Parse {
                row: i + 1,
                value: row.departure.clone(),
            })?;
            timetable.add(row.line, row.station, time);
        }
        for times in timetable.departures.values_mut() {
            times.sort_unstable();
            times.dedup();
        }
        Ok(timetable)
    }

    fn add(&mut self, line: String, station: String, time: NaiveTime) {
        self.departures.entry((line, station)).or_default().push(time);
    }

    /// Total number of departures.
    pub fn len(&self) -> usize {
        self.departures.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    /// All departures of `line` from `station`, sorted.
    pub fn departures(&self, line: &str, station: &str) -> &[NaiveTime] {
        self.departures
            .get(&(line.to_string(), station.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl DepartureOracle for Timetable {
    fn next_departure(
        &self,
        line: &str,
        station: &str,
        reference: NaiveTime,
        travel: Duration,
    ) -> NaiveTime {
        let target = reference + travel;
        let times = self.departures(line, station);
        let next = times.partition_point(|t| *t <= target);
        times.get(next).copied().unwrap_or(target)
    }
}

/// Parse `HH:MM` or `HH:MM:SS`, wrapping hours past midnight.
pub fn parse_departure(value: &str) -> Option<NaiveTime> {
    let mut parts = value.trim().split(':');
    let hours: u32 = parts.next()?.parse().ok()?;
    let minutes: u32 = parts.next()?.parse().ok()?;
    let seconds: u32 = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveTime::from_hms_opt(hours % 24, minutes, seconds)
}
