use crate::domain::model::{ProcessingReport, ReadingBatch, SensorLimits, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// File paths directly inside `dir` whose extension equals `extension`.
    fn list_files(
        &self,
        dir: &str,
        extension: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn incoming_dir(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn sensor_limits(&self) -> &SensorLimits;
    fn interval_minutes(&self) -> f64;
    fn concurrency(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// File name reported in `input_file`.
    fn input_name(&self) -> String;
    async fn extract(&self) -> Result<ReadingBatch>;
    async fn transform(&self, batch: ReadingBatch) -> Result<TransformResult>;
    async fn load(&self, report: ProcessingReport) -> Result<ProcessingReport>;
}
