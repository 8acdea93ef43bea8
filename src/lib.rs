pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::LocalStorage;
pub use config::{toml_config::TomlConfig, Settings};
pub use self::core::{batch::BatchProcessor, etl::EtlEngine, pipeline::SensorPipeline};
pub use domain::model::{BatchSummary, ProcessingReport, ProcessingStatus, SensorMetrics};
pub use utils::error::{ProcessorError, Result};
