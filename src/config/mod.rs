#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::metrics::DEFAULT_INTERVAL_MINUTES;
use crate::domain::model::SensorLimits;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INCOMING_DIR: &str = "data/incoming";
pub const DEFAULT_OUTPUT_DIR: &str = "data/processed";

/// Effective settings after defaults, the optional TOML file and CLI flags are merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub incoming_dir: String,
    pub output_dir: String,
    pub limits: SensorLimits,
    pub interval_minutes: f64,
    pub concurrency: usize,
    pub monitor: bool,
    pub log_level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            incoming_dir: DEFAULT_INCOMING_DIR.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            limits: SensorLimits::default(),
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            concurrency: 1,
            monitor: false,
            log_level: None,
        }
    }
}

impl ConfigProvider for Settings {
    fn incoming_dir(&self) -> &str {
        &self.incoming_dir
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn sensor_limits(&self) -> &SensorLimits {
        &self.limits
    }

    fn interval_minutes(&self) -> f64 {
        self.interval_minutes
    }

    fn concurrency(&self) -> usize {
        self.concurrency
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("paths.incoming_dir", &self.incoming_dir)?;
        validation::validate_path("paths.output_dir", &self.output_dir)?;
        validation::validate_range("metrics.interval_minutes", self.interval_minutes, 0.01, 1440.0)?;
        validation::validate_positive_number("processing.concurrency", self.concurrency, 1)?;

        validation::validate_value_range("limits.voltage", &self.limits.voltage)?;
        validation::validate_value_range("limits.current", &self.limits.current)?;
        validation::validate_value_range("limits.temperature", &self.limits.temperature)?;
        validation::validate_value_range("limits.power", &self.limits.power)?;

        if let Some(level) = &self.log_level {
            let known = ["trace", "debug", "info", "warn", "error"];
            if !known.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(crate::utils::error::ProcessorError::InvalidConfigValueError {
                    field: "monitoring.log_level".to_string(),
                    value: level.clone(),
                    reason: format!("Valid levels: {}", known.join(", ")),
                });
            }
        }
        Ok(())
    }
}
