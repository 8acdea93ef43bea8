use crate::core::{ingest, metrics};
use crate::domain::model::{ProcessingReport, ReadingBatch, TransformResult};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::{ProcessorError, Result};
use std::path::Path;

/// Suffix appended to the input stem to name its JSON report.
pub const OUTPUT_SUFFIX: &str = "_processed.json";

/// Output file name for an input path: `readings.csv` becomes `readings_processed.json`.
pub fn output_file_name(input_path: &str) -> String {
    let stem = Path::new(input_path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}{}", stem, OUTPUT_SUFFIX)
}

/// Serializes a report as JSON indented with four spaces.
pub fn render_report(report: &ProcessingReport) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    serde::Serialize::serialize(report, &mut serializer)?;
    Ok(buffer)
}

/// Extract/transform/load for a single sensor CSV file.
pub struct SensorPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) input_path: String,
}

impl<S: Storage, C: ConfigProvider> SensorPipeline<S, C> {
    pub fn new(storage: S, config: C, input_path: impl Into<String>) -> Self {
        Self {
            storage,
            config,
            input_path: input_path.into(),
        }
    }

    pub fn input_path(&self) -> &str {
        &self.input_path
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SensorPipeline<S, C> {
    fn input_name(&self) -> String {
        Path::new(&self.input_path)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input_path.clone())
    }

    async fn extract(&self) -> Result<ReadingBatch> {
        if !self.storage.exists(&self.input_path).await {
            return Err(ProcessorError::InputNotFound {
                path: self.input_path.clone(),
            });
        }

        tracing::debug!("Reading sensor data from: {}", self.input_path);
        let data = self.storage.read_file(&self.input_path).await?;
        let batch = ingest::read_readings(&data, self.config.sensor_limits())?;

        tracing::debug!(
            "{}: {} valid, {} invalid rows",
            self.input_path,
            batch.readings.len(),
            batch.invalid
        );
        Ok(batch)
    }

    async fn transform(&self, batch: ReadingBatch) -> Result<TransformResult> {
        if batch.readings.is_empty() {
            return Err(ProcessorError::NoValidRecords {
                invalid: batch.invalid,
            });
        }

        let metrics = metrics::calculate_metrics(&batch.readings, self.config.interval_minutes())?;
        Ok(TransformResult {
            records_processed: batch.readings.len(),
            records_invalid: batch.invalid,
            metrics,
        })
    }

    async fn load(&self, mut report: ProcessingReport) -> Result<ProcessingReport> {
        let output_file = output_file_name(&self.input_path);
        let output_path = Path::new(self.config.output_dir()).join(&output_file);
        report.output_file = Some(output_file);

        let body = render_report(&report)?;
        tracing::debug!(
            "Writing report ({} bytes) to {}",
            body.len(),
            output_path.display()
        );
        self.storage
            .write_file(&output_path.to_string_lossy(), &body)
            .await?;

        Ok(report)
    }
}
