use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Input file does not exist")]
    InputNotFound { path: String },

    #[error("All records invalid")]
    NoValidRecords { invalid: usize },

    #[error("Directory {path} does not exist")]
    IncomingDirMissing { path: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ProcessorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InputNotFound { .. } | Self::IncomingDirMissing { .. } => ErrorCategory::Input,
            Self::CsvError(_) | Self::NoValidRecords { .. } | Self::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit status when this error ends the run: `2` for data errors,
    /// `1` for configuration or input problems, `3` for system failures.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// Number of rejected rows, known only when the whole file was rejected.
    pub fn invalid_records(&self) -> Option<usize> {
        match self {
            Self::NoValidRecords { invalid } => Some(*invalid),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InputNotFound { .. } => "Check that the file was not moved while the batch ran",
            Self::IncomingDirMissing { .. } => {
                "Create the incoming directory or pass --incoming-dir"
            }
            Self::NoValidRecords { .. } => {
                "Check the CSV columns (timestamp,voltage,current,temperature,power) and sensor ranges"
            }
            Self::CsvError(_) => "Make sure the file is UTF-8 CSV with a header row",
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the configuration file and CLI flags",
            Self::IoError(_) => "Check file permissions and free disk space",
            Self::SerializationError(_) | Self::ProcessingError { .. } => {
                "Re-run with --verbose and inspect the logs"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Input => format!("Input problem: {}", self),
            ErrorCategory::Data => format!("Could not process data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
