pub mod batch;
pub mod etl;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod validator;

pub use crate::domain::model::{ProcessingReport, ReadingBatch, SensorReading, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
