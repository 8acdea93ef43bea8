use crate::core::validator::validate_reading;
use crate::domain::model::{RawReading, ReadingBatch, SensorLimits, SensorReading, Timestamp};
use crate::utils::error::Result;

/// Expected header of an incoming sensor export. Extra columns are ignored.
pub const CSV_COLUMNS: [&str; 5] = ["timestamp", "voltage", "current", "temperature", "power"];

fn parse_number(value: Option<&str>) -> Option<f64> {
    value?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Converts a raw row, returning `None` when any field is missing or malformed.
pub fn parse_reading(raw: &RawReading) -> Option<SensorReading> {
    Some(SensorReading {
        voltage: parse_number(raw.voltage.as_deref())?,
        current: parse_number(raw.current.as_deref())?,
        temperature: parse_number(raw.temperature.as_deref())?,
        power: parse_number(raw.power.as_deref())?,
        timestamp: Timestamp::parse(raw.timestamp.as_deref()?)?,
    })
}

/// Decodes a CSV export and keeps the rows that parse and fall inside `limits`.
///
/// Row-level problems never fail the call; they are counted in
/// [`ReadingBatch::invalid`]. Only an unreadable header is an error.
pub fn read_readings(data: &[u8], limits: &SensorLimits) -> Result<ReadingBatch> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = CSV_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        tracing::warn!("CSV header is missing columns: {}", missing.join(", "));
    }

    let mut batch = ReadingBatch::default();

    for (index, row) in reader.deserialize::<RawReading>().enumerate() {
        let row_number = index + 1;

        let raw = match row {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("Row {} could not be decoded: {}", row_number, e);
                batch.invalid += 1;
                continue;
            }
        };

        let Some(reading) = parse_reading(&raw) else {
            tracing::debug!("Row {} has missing or non-numeric fields", row_number);
            batch.invalid += 1;
            continue;
        };

        match validate_reading(&reading, limits) {
            Ok(()) => batch.readings.push(reading),
            Err(violation) => {
                tracing::debug!("Row {} rejected: {}", row_number, violation);
                batch.invalid += 1;
            }
        }
    }

    Ok(batch)
}
