//! Station registry: raw records in, deduplicated station set out.
//!
//! The registry is the only place that mints `Station` values. Records are
//! processed in order; a record whose (name, line, complex) triple has
//! already been seen is dropped, not merged. Identifiers are handed out in
//! first-seen order starting from a caller-chosen value.

mod loader;

use std::collections::{HashMap, HashSet};
use std::ops::Index;

use tracing::debug;

use crate::domain::{
    BuildError, ComplexId, DEFAULT_STATION_WEIGHT, GeoPoint, Station, StationId,
};

pub use loader::{load_stations_csv, load_stations_reader};

/// One unvalidated station row as it arrives from the data source.
///
/// Numeric fields are kept as text so validation (and its error reporting)
/// happens in one place.
#[derive(Debug, Clone, Default)]
pub struct RawStation {
    pub latitude: String,
    pub longitude: String,
    pub station_name: String,
    pub line: String,
    pub complex_id: String,
    pub weight: Option<String>,
    pub incidents: Option<String>,
    pub ridership: Option<String>,
}

impl RawStation {
    /// Convenience constructor for the required fields.
    pub fn new(
        latitude: impl ToString,
        longitude: impl ToString,
        station_name: impl Into<String>,
        line: impl Into<String>,
        complex_id: impl ToString,
    ) -> Self {
        Self {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            station_name: station_name.into(),
            line: line.into(),
            complex_id: complex_id.to_string(),
            ..Self::default()
        }
    }

    pub fn with_weight(mut self, weight: impl ToString) -> Self {
        self.weight = Some(weight.to_string());
        self
    }

    pub fn with_counts(mut self, incidents: u64, ridership: u64) -> Self {
        self.incidents = Some(incidents.to_string());
        self.ridership = Some(ridership.to_string());
        self
    }
}

/// Incidents per rider; zero when there are no riders.
pub fn risk_ratio(incidents: u64, ridership: u64) -> f64 {
    if ridership == 0 {
        0.0
    } else {
        incidents as f64 / ridership as f64
    }
}

/// Ordered, deduplicated stations plus the explicit id→position table.
///
/// Matrix code addresses stations by position (0-based), queries address
/// them by `StationId`; this type is the bridge between the two.
#[derive(Debug, Clone, Default)]
pub struct StationSet {
    stations: Vec<Station>,
    positions: HashMap<StationId, usize>,
}

impl StationSet {
    /// Assemble a set from already-minted stations (e.g. a persisted dump).
    ///
    /// Fails if two stations share an identifier.
    pub fn from_stations(stations: Vec<Station>) -> Result<Self, BuildError> {
        let mut positions = HashMap::with_capacity(stations.len());
        for (index, station) in stations.iter().enumerate() {
            if positions.insert(station.id(), index).is_some() {
                return Err(BuildError::DuplicateStation(station.id()));
            }
        }
        Ok(Self {
            stations,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Matrix position of a station.
    pub fn index_of(&self, id: StationId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn get(&self, id: StationId) -> Option<&Station> {
        self.index_of(id).map(|i| &self.stations[i])
    }

    pub fn contains(&self, id: StationId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Station> {
        self.stations.iter()
    }

    pub fn as_slice(&self) -> &[Station] {
        &self.stations
    }
}

impl Index<usize> for StationSet {
    type Output = Station;

    fn index(&self, index: usize) -> &Station {
        &self.stations[index]
    }
}

impl<'a> IntoIterator for &'a StationSet {
    type Item = &'a Station;
    type IntoIter = std::slice::Iter<'a, Station>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.iter()
    }
}

/// Incremental station builder.
#[derive(Debug)]
pub struct StationRegistry {
    next_id: u32,
    default_weight: f64,
    seen: HashSet<(String, String, ComplexId)>,
    stations: Vec<Station>,
}

impl StationRegistry {
    /// Create a registry that assigns identifiers from `start_id` upwards.
    pub fn new(start_id: u32) -> Self {
        Self {
            next_id: start_id,
            default_weight: DEFAULT_STATION_WEIGHT,
            seen: HashSet::new(),
            stations: Vec::new(),
        }
    }

    /// Override the weight used for records that carry none.
    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = weight;
        self
    }

    /// Validate and register one record.
    ///
    /// `row` is the 1-based position of the record in its source and only
    /// used for error reporting. Returns the new station's id, or `None` if
    /// the record duplicates an earlier one.
    pub fn push(&mut self, row: usize, raw: &RawStation) -> Result<Option<StationId>, BuildError> {
        let lat = parse_float(row, "latitude", &raw.latitude)?;
        let lon = parse_float(row, "longitude", &raw.longitude)?;
        let position = GeoPoint::new(lat, lon);
        if !position.is_valid() {
            return Err(BuildError::malformed(
                row,
                "latitude",
                format!("is outside the valid coordinate range: {position}"),
            ));
        }

        let name = required_text(row, "station_name", &raw.station_name)?;
        let line = required_text(row, "line", &raw.line)?;
        let complex = ComplexId(parse_unsigned(row, "complex_id", &raw.complex_id)?);
        let weight = self.resolve_weight(row, raw)?;

        let key = (name.to_string(), line.to_string(), complex);
        if self.seen.contains(&key) {
            debug!(row, name, line, %complex, "Dropping duplicate station record");
            return Ok(None);
        }

        let id = StationId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| BuildError::malformed(row, "id", "exhausts the identifier space"))?;

        self.stations
            .push(Station::new(id, position, name, line, complex, weight));
        self.seen.insert(key);
        Ok(Some(id))
    }

    /// Finish registration.
    pub fn finish(self) -> Result<StationSet, BuildError> {
        StationSet::from_stations(self.stations)
    }

    fn resolve_weight(&self, row: usize, raw: &RawStation) -> Result<f64, BuildError> {
        if let Some(text) = non_blank(raw.weight.as_deref()) {
            let weight = parse_float(row, "weight", text)?;
            if weight < 0.0 {
                return Err(BuildError::malformed(
                    row,
                    "weight",
                    format!("must be non-negative, got {weight}"),
                ));
            }
            return Ok(weight);
        }

        match (
            non_blank(raw.incidents.as_deref()),
            non_blank(raw.ridership.as_deref()),
        ) {
            (Some(incidents), Some(ridership)) => {
                let incidents = parse_count(row, "incidents", incidents)?;
                let ridership = parse_count(row, "ridership", ridership)?;
                Ok(risk_ratio(incidents, ridership))
            }
            _ => Ok(self.default_weight),
        }
    }
}

/// Build a station set from `records`, assigning ids from `start_id`.
///
/// The first malformed record aborts the whole build.
pub fn build_stations(
    records: &[RawStation],
    start_id: u32,
    default_weight: f64,
) -> Result<StationSet, BuildError> {
    let mut registry = StationRegistry::new(start_id).with_default_weight(default_weight);
    for (i, raw) in records.iter().enumerate() {
        registry.push(i + 1, raw)?;
    }
    registry.finish()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn required_text<'a>(row: usize, field: &'static str, value: &'a str) -> Result<&'a str, BuildError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BuildError::malformed(row, field, "is missing"));
    }
    Ok(value)
}

fn parse_float(row: usize, field: &'static str, value: &str) -> Result<f64, BuildError> {
    let text = required_text(row, field, value)?;
    let parsed: f64 = text
        .parse()
        .map_err(|_| BuildError::malformed(row, field, format!("is not a number: {text:?}")))?;
    if !parsed.is_finite() {
        return Err(BuildError::malformed(row, field, format!("is not finite: {text:?}")));
    }
    Ok(parsed)
}

fn parse_unsigned(row: usize, field: &'static str, value: &str) -> Result<u32, BuildError> {
    let text = required_text(row, field, value)?;
    text.parse().map_err(|_| {
        BuildError::malformed(row, field, format!("is not a non-negative integer: {text:?}"))
    })
}

fn parse_count(row: usize, field: &'static str, value: &str) -> Result<u64, BuildError> {
    value.parse().map_err(|_| {
        BuildError::malformed(row, field, format!("is not a non-negative integer: {value:?}"))
    })
}
