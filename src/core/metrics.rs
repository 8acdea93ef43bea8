use crate::domain::model::{RangeStats, SensorMetrics, SensorReading, VoltageStats};
use crate::utils::error::{ProcessorError, Result};
use std::collections::HashMap;

/// Default spacing between two consecutive sensor samples.
pub const DEFAULT_INTERVAL_MINUTES: f64 = 5.0;

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Sample standard deviation (n - 1 denominator); zero for fewer than two values.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

fn range_stats(values: &[f64]) -> RangeStats {
    RangeStats {
        avg: mean(values),
        min: min(values),
        max: max(values),
    }
}

/// Energy in kWh, assuming every reading stands for one sampling interval.
pub fn total_energy_kwh(readings: &[SensorReading], interval_minutes: f64) -> f64 {
    let interval_hours = interval_minutes / 60.0;
    readings
        .iter()
        .map(|r| r.power * interval_hours / 1000.0)
        .sum()
}

/// Hour bucket with the highest mean power. Ties go to the bucket seen first.
pub fn peak_power_hour(readings: &[SensorReading]) -> Option<String> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, (f64, usize)> = HashMap::new();

    for reading in readings {
        let hour = reading.timestamp.truncate_to_hour().to_string();
        let entry = buckets.entry(hour.clone()).or_insert_with(|| {
            order.push(hour);
            (0.0, 0)
        });
        entry.0 += reading.power;
        entry.1 += 1;
    }

    let mut peak: Option<(&String, f64)> = None;
    for hour in &order {
        let (sum, count) = buckets[hour];
        let avg = sum / count as f64;
        if peak.map_or(true, |(_, best)| avg > best) {
            peak = Some((hour, avg));
        }
    }

    peak.map(|(hour, _)| hour.clone())
}

pub fn calculate_metrics(readings: &[SensorReading], interval_minutes: f64) -> Result<SensorMetrics> {
    if readings.is_empty() {
        return Err(ProcessorError::NoValidRecords { invalid: 0 });
    }

    let voltages: Vec<f64> = readings.iter().map(|r| r.voltage).collect();
    let currents: Vec<f64> = readings.iter().map(|r| r.current).collect();
    let temperatures: Vec<f64> = readings.iter().map(|r| r.temperature).collect();

    let peak_power_hour = peak_power_hour(readings).ok_or_else(|| {
        ProcessorError::ProcessingError {
            message: "could not determine peak power hour".to_string(),
        }
    })?;

    Ok(SensorMetrics {
        voltage: VoltageStats {
            avg: mean(&voltages),
            min: min(&voltages),
            max: max(&voltages),
            std: sample_std(&voltages),
        },
        current: range_stats(&currents),
        temperature: range_stats(&temperatures),
        total_energy_kwh: total_energy_kwh(readings, interval_minutes),
        peak_power_hour,
    })
}
