use crate::domain::model::ProcessingReport;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Local wall-clock time in ISO-8601 with microseconds, as stamped on reports.
pub fn timestamp_now() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract, transform and load, propagating the first failure.
    pub async fn run(&self) -> Result<ProcessingReport> {
        let report = ProcessingReport::pending(self.pipeline.input_name(), timestamp_now());
        self.run_with(report).await
    }

    /// Like [`run`](Self::run) but never fails: errors become an error report.
    pub async fn process(&self) -> ProcessingReport {
        let report = ProcessingReport::pending(self.pipeline.input_name(), timestamp_now());

        match self.run_with(report.clone()).await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(
                    "{} failed: {} (Category: {:?}, Severity: {:?})",
                    report.input_file,
                    e,
                    e.category(),
                    e.severity()
                );
                report.failed(&e)
            }
        }
    }

    async fn run_with(&self, report: ProcessingReport) -> Result<ProcessingReport> {
        let name = report.input_file.clone();
        tracing::info!("Processing {}", name);
        self.monitor.log_stats("Start");

        let batch = self.pipeline.extract().await?;
        tracing::debug!(
            "Extracted {} readings ({} invalid) from {}",
            batch.readings.len(),
            batch.invalid,
            name
        );
        self.monitor.log_stats("Extract");

        let result = self.pipeline.transform(batch).await?;
        tracing::debug!("Computed metrics over {} readings", result.records_processed);
        self.monitor.log_stats("Transform");

        let report = self.pipeline.load(report.succeeded(result)).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        tracing::info!(
            "{} -> {} ({} processed, {} invalid)",
            name,
            report.output_file.as_deref().unwrap_or("-"),
            report.records_processed,
            report.records_invalid
        );
        Ok(report)
    }
}
