use crate::domain::model::{SensorLimits, SensorReading, ValueRange};
use std::fmt;

/// First field of a reading found outside its allowed range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeViolation {
    pub field: &'static str,
    pub value: f64,
    pub range: ValueRange,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let min = self.range.min.map(|v| v.to_string()).unwrap_or_else(|| "-inf".into());
        let max = self.range.max.map(|v| v.to_string()).unwrap_or_else(|| "inf".into());
        write!(f, "{} {} outside [{}, {}]", self.field, self.value, min, max)
    }
}

/// Checks voltage, current, temperature and power, in that order.
pub fn validate_reading(
    reading: &SensorReading,
    limits: &SensorLimits,
) -> std::result::Result<(), RangeViolation> {
    let checks = [
        ("voltage", reading.voltage, limits.voltage),
        ("current", reading.current, limits.current),
        ("temperature", reading.temperature, limits.temperature),
        ("power", reading.power, limits.power),
    ];

    for (field, value, range) in checks {
        if !range.contains(value) {
            return Err(RangeViolation { field, value, range });
        }
    }
    Ok(())
}

pub fn is_valid(reading: &SensorReading, limits: &SensorLimits) -> bool {
    validate_reading(reading, limits).is_ok()
}
