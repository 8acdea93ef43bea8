use crate::core::etl::EtlEngine;
use crate::core::pipeline::SensorPipeline;
use crate::domain::model::{BatchSummary, ProcessingReport};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{ProcessorError, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub const INPUT_EXTENSION: &str = "csv";

/// Processes every CSV file in the incoming directory.
pub struct BatchProcessor<S, C> {
    storage: S,
    config: C,
    monitor: bool,
}

impl<S, C> BatchProcessor<S, C>
where
    S: Storage + Clone + 'static,
    C: ConfigProvider + Clone + 'static,
{
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            monitor: false,
        }
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = enabled;
        self
    }

    /// CSV files in the incoming directory, sorted by path.
    pub async fn discover(&self) -> Result<Vec<String>> {
        let incoming_dir = self.config.incoming_dir();
        if !self.storage.exists(incoming_dir).await {
            return Err(ProcessorError::IncomingDirMissing {
                path: incoming_dir.to_string(),
            });
        }

        let files = self.storage.list_files(incoming_dir, INPUT_EXTENSION).await?;
        tracing::debug!("Discovered {} CSV file(s) in {}", files.len(), incoming_dir);
        Ok(files)
    }

    fn engine_for(&self, path: &str) -> EtlEngine<SensorPipeline<S, C>> {
        let pipeline = SensorPipeline::new(self.storage.clone(), self.config.clone(), path);
        EtlEngine::new_with_monitoring(pipeline, self.monitor)
    }

    pub async fn process_file(&self, path: &str) -> ProcessingReport {
        self.engine_for(path).process().await
    }

    /// Processes `files` and returns reports in the same order.
    pub async fn process_files(&self, files: &[String]) -> BatchSummary {
        let concurrency = self.config.concurrency().max(1);

        let results = if concurrency == 1 || files.len() <= 1 {
            let mut results = Vec::with_capacity(files.len());
            for path in files {
                results.push(self.process_file(path).await);
            }
            results
        } else {
            self.process_concurrently(files, concurrency).await
        };

        BatchSummary { results }
    }

    async fn process_concurrently(&self, files: &[String], concurrency: usize) -> Vec<ProcessingReport> {
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks = JoinSet::new();

        for (index, path) in files.iter().enumerate() {
            let engine = self.engine_for(path);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                (index, engine.process().await)
            });
        }

        let mut slots: Vec<Option<ProcessingReport>> = vec![None; files.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => slots[index] = Some(report),
                Err(e) => tracing::error!("File task aborted: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(files)
            .map(|(slot, path)| {
                slot.unwrap_or_else(|| {
                    let name = std::path::Path::new(path)
                        .file_name()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.clone());
                    ProcessingReport::pending(name, crate::core::etl::timestamp_now()).failed(
                        &ProcessorError::ProcessingError {
                            message: "processing task aborted".to_string(),
                        },
                    )
                })
            })
            .collect()
    }

    /// Discovers and processes all files.
    pub async fn run(&self) -> Result<BatchSummary> {
        let files = self.discover().await?;
        Ok(self.process_files(&files).await)
    }

    /// Writes the batch summary as pretty JSON to `path`.
    pub async fn write_summary(&self, summary: &BatchSummary, path: &str) -> Result<()> {
        let body = serde_json::to_vec_pretty(summary)?;
        self.storage.write_file(path, &body).await?;
        tracing::info!("📁 Batch summary saved to: {}", path);
        Ok(())
    }
}
