//! The `id;lat;lon;name;line;complex;weight` station record.

use super::DumpError;
use crate::domain::{ComplexId, GeoPoint, Station, StationId};

/// Field separator inside a record.
pub const FIELD_SEP: char = ';';
/// Record terminator.
pub const RECORD_SEP: char = '@';

const FIELDS: usize = 7;

/// Append the record for `station` to `out`.
///
/// Fails if the name or line contains a separator or a line break.
pub fn encode_station(out: &mut String, station: &Station) -> Result<(), DumpError> {
    check_text("name", station.name())?;
    check_text("line", station.line())?;
    let p = station.position();
    out.push_str(&format!(
        "{};{};{};{};{};{};{}",
        station.id(),
        p.lat,
        p.lon,
        station.name(),
        station.line(),
        station.complex(),
        station.weight()
    ));
    Ok(())
}

/// Split `record` into the station fields and any trailing fields.
pub fn decode_station<'a>(
    record: &'a str,
    line: usize,
) -> Result<(Station, Vec<&'a str>), DumpError> {
    let fields: Vec<&str> = record.split(FIELD_SEP).collect();
    if fields.len() < FIELDS {
        return Err(DumpError::malformed(
            line,
            format!("station record has {} fields, expected {FIELDS}: {record:?}", fields.len()),
        ));
    }

    let id = StationId(parse(fields[0], "id", line)?);
    let lat: f64 = parse(fields[1], "latitude", line)?;
    let lon: f64 = parse(fields[2], "longitude", line)?;
    let complex = ComplexId(parse(fields[5], "complex", line)?);
    let weight: f64 = parse(fields[6], "weight", line)?;

    let station = Station::new(id, GeoPoint::new(lat, lon), fields[3], fields[4], complex, weight);
    Ok((station, fields[FIELDS..].to_vec()))
}

/// Parse just the id of a record.
pub fn decode_id(record: &str, line: usize) -> Result<StationId, DumpError> {
    let first = record.split(FIELD_SEP).next().unwrap_or_default();
    Ok(StationId(parse(first, "id", line)?))
}

/// The `@`-terminated records of one dump line.
pub fn records(text: &str) -> impl Iterator<Item = &str> {
    let body = text.strip_suffix(RECORD_SEP).unwrap_or(text);
    body.split(RECORD_SEP).filter(|r| !r.is_empty())
}

fn check_text(field: &'static str, value: &str) -> Result<(), DumpError> {
    if value.contains([FIELD_SEP, RECORD_SEP, '\n', '\r']) {
        return Err(DumpError::ReservedCharacter {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn parse<T: std::str::FromStr>(text: &str, field: &str, line: usize) -> Result<T, DumpError> {
    text.trim()
        .parse()
        .map_err(|_| DumpError::malformed(line, format!("invalid {field}: {text:?}")))
}
