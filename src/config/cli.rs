use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::Parser;

/// Command-line flags. Anything left unset falls back to the config file, then defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "tarucca-processor")]
#[command(about = "Processes solar panel sensor CSV exports into JSON metric reports")]
pub struct CliConfig {
    /// Directory scanned for *.csv files [default: data/incoming]
    #[arg(long)]
    pub incoming_dir: Option<String>,

    /// Directory receiving <stem>_processed.json reports [default: data/processed]
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Minutes between two sensor samples, used for energy totals [default: 5]
    #[arg(long)]
    pub interval_minutes: Option<f64>,

    /// Number of files processed at the same time [default: 1]
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Also write the batch summary as JSON to this path
    #[arg(long)]
    pub summary: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Log CPU and memory usage per processing phase
    #[arg(long)]
    pub monitor: bool,
}

impl CliConfig {
    pub fn log_format(&self) -> LogFormat {
        if self.json_logs {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }

    /// Builds the effective settings: defaults, then the config file, then flags.
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => TomlConfig::from_file(path)?.to_settings(),
            None => Settings::default(),
        };

        if let Some(dir) = &self.incoming_dir {
            settings.incoming_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        if let Some(interval) = self.interval_minutes {
            settings.interval_minutes = interval;
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = concurrency;
        }
        if self.monitor {
            settings.monitor = true;
        }

        Ok(settings)
    }
}
