use crate::config::Settings;
use crate::domain::model::ValueRange;
use crate::utils::error::{ProcessorError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Optional processor configuration file. Every section and key may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub paths: PathsConfig,
    pub limits: LimitsConfig,
    pub metrics: MetricsConfig,
    pub processing: ProcessingConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub incoming_dir: Option<String>,
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    pub voltage: Option<ValueRange>,
    pub current: Option<ValueRange>,
    pub temperature: Option<ValueRange>,
    pub power: Option<ValueRange>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    pub interval_minutes: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitoringConfig {
    pub enabled: Option<bool>,
    pub log_level: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ProcessorError::ConfigValidationError {
                field: path.as_ref().display().to_string(),
                message: format!("cannot read config file: {}", e),
            }
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ProcessorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_ROOT})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Overlays the values present in this file on top of `settings`.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(dir) = &self.paths.incoming_dir {
            settings.incoming_dir = dir.clone();
        }
        if let Some(dir) = &self.paths.output_dir {
            settings.output_dir = dir.clone();
        }

        if let Some(range) = self.limits.voltage {
            settings.limits.voltage = range;
        }
        if let Some(range) = self.limits.current {
            settings.limits.current = range;
        }
        if let Some(range) = self.limits.temperature {
            settings.limits.temperature = range;
        }
        if let Some(range) = self.limits.power {
            settings.limits.power = range;
        }

        if let Some(interval) = self.metrics.interval_minutes {
            settings.interval_minutes = interval;
        }
        if let Some(concurrency) = self.processing.concurrency {
            settings.concurrency = concurrency;
        }
        if let Some(enabled) = self.monitoring.enabled {
            settings.monitor = enabled;
        }
        if let Some(level) = &self.monitoring.log_level {
            settings.log_level = Some(level.clone());
        }
    }

    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();
        self.apply_to(&mut settings);
        settings
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_settings().validate()
    }
}
