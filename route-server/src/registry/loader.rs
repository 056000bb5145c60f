//! CSV station loader.
//!
//! # CSV format
//!
//! One row per station platform, with a header row. The last three columns
//! are optional and may be omitted or left blank.
//!
//! ```csv
//! latitude,longitude,station_name,line,complex_id,weight,incidents,ridership
//! 40.755477,-73.987691,Times Sq-42 St,1,611,,12,48000
//! 40.761728,-73.983849,50 St,1,612,0.00011,,
//! ```

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::info;

use super::{RawStation, StationSet, build_stations};
use crate::domain::BuildError;

/// Load and register stations from a CSV file.
pub fn load_stations_csv(
    path: &Path,
    start_id: u32,
    default_weight: f64,
) -> Result<StationSet, BuildError> {
    let file = std::fs::File::open(path)?;
    let set = load_stations_reader(file, start_id, default_weight)?;
    info!(path = %path.display(), stations = set.len(), "Loaded stations");
    Ok(set)
}

/// Like [`load_stations_csv`] but accepts any `Read` source.
///
/// A required column absent from the header is reported at row 0. Short
/// rows leave their trailing fields blank, which the registry rejects for
/// required fields.
pub fn load_stations_reader<R: Read>(
    reader: R,
    start_id: u32,
    default_weight: f64,
) -> Result<StationSet, BuildError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_header(csv_reader.headers()?)?;
    let records = csv_reader
        .records()
        .map(|record| record.map(|r| columns.raw(&r)))
        .collect::<Result<Vec<_>, _>>()?;

    build_stations(&records, start_id, default_weight)
}

/// Header positions of the station columns.
struct Columns {
    latitude: usize,
    longitude: usize,
    station_name: usize,
    line: usize,
    complex_id: usize,
    weight: Option<usize>,
    incidents: Option<usize>,
    ridership: Option<usize>,
}

impl Columns {
    fn from_header(header: &StringRecord) -> Result<Self, BuildError> {
        let find = |name: &str| header.iter().position(|h| h == name);
        let required = |name: &'static str| {
            find(name).ok_or_else(|| BuildError::malformed(0, name, "is missing from the header"))
        };

        Ok(Self {
            latitude: required("latitude")?,
            longitude: required("longitude")?,
            station_name: required("station_name")?,
            line: required("line")?,
            complex_id: required("complex_id")?,
            weight: find("weight"),
            incidents: find("incidents"),
            ridership: find("ridership"),
        })
    }

    fn raw(&self, record: &StringRecord) -> RawStation {
        let text = |i: usize| record.get(i).unwrap_or_default().to_string();
        let optional = |i: Option<usize>| i.and_then(|i| record.get(i)).map(str::to_string);

        RawStation {
            latitude: text(self.latitude),
            longitude: text(self.longitude),
            station_name: text(self.station_name),
            line: text(self.line),
            complex_id: text(self.complex_id),
            weight: optional(self.weight),
            incidents: optional(self.incidents),
            ridership: optional(self.ridership),
        }
    }
}
