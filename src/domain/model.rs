use serde::{Deserialize, Serialize, Serializer};

pub use super::timestamp::Timestamp;

/// One CSV row before any conversion. Missing columns stay `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawReading {
    pub timestamp: Option<String>,
    pub voltage: Option<String>,
    pub current: Option<String>,
    pub temperature: Option<String>,
    pub power: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub timestamp: Timestamp,
    pub voltage: f64,
    pub current: f64,
    pub temperature: f64,
    pub power: f64,
}

/// Inclusive bounds for one measured quantity. `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ValueRange {
    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Physical operating envelope of a panel sensor; readings outside it are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorLimits {
    pub voltage: ValueRange,
    pub current: ValueRange,
    pub temperature: ValueRange,
    pub power: ValueRange,
}

impl Default for SensorLimits {
    fn default() -> Self {
        Self {
            voltage: ValueRange::between(18.0, 32.0),
            current: ValueRange::between(0.0, 12.0),
            temperature: ValueRange::between(-10.0, 80.0),
            power: ValueRange::at_least(0.0),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReadingBatch {
    pub readings: Vec<SensorReading>,
    pub invalid: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorMetrics {
    pub voltage: VoltageStats,
    pub current: RangeStats,
    pub temperature: RangeStats,
    pub total_energy_kwh: f64,
    pub peak_power_hour: String,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records_processed: usize,
    pub records_invalid: usize,
    pub metrics: SensorMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Success,
    Error,
}

/// Outcome of processing one input file. Serialized as the per-file JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingReport {
    pub input_file: String,
    pub output_file: Option<String>,
    pub processed_at: String,
    pub status: ProcessingStatus,
    pub records_processed: usize,
    pub records_invalid: usize,
    #[serde(serialize_with = "metrics_or_empty")]
    pub metrics: Option<SensorMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn metrics_or_empty<S: Serializer>(
    metrics: &Option<SensorMetrics>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match metrics {
        Some(metrics) => metrics.serialize(serializer),
        None => serde_json::Map::new().serialize(serializer),
    }
}

impl ProcessingReport {
    pub fn pending(input_file: impl Into<String>, processed_at: impl Into<String>) -> Self {
        Self {
            input_file: input_file.into(),
            output_file: None,
            processed_at: processed_at.into(),
            status: ProcessingStatus::Pending,
            records_processed: 0,
            records_invalid: 0,
            metrics: None,
            error: None,
        }
    }

    pub fn succeeded(mut self, result: TransformResult) -> Self {
        self.status = ProcessingStatus::Success;
        self.records_processed = result.records_processed;
        self.records_invalid = result.records_invalid;
        self.metrics = Some(result.metrics);
        self.error = None;
        self
    }

    pub fn failed(mut self, error: &crate::utils::error::ProcessorError) -> Self {
        self.status = ProcessingStatus::Error;
        self.output_file = None;
        self.metrics = None;
        if let Some(invalid) = error.invalid_records() {
            self.records_invalid = invalid;
        }
        self.error = Some(error.to_string());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ProcessingStatus::Success
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub results: Vec<ProcessingReport>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.total() - self.success_count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }

    /// `0` when every file succeeded (or there were none), `2` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.all_succeeded() {
            0
        } else {
            2
        }
    }
}
