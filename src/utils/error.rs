use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to read file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse SIM record on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Quantity mismatch between records: {actual} and header quantity: {declared}")]
    QuantityMismatch { declared: usize, actual: usize },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Failed to read folder {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Validation,
    Storage,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl IngestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IngestError::FileRead { .. } | IngestError::Parse { .. } => ErrorCategory::Input,
            IngestError::QuantityMismatch { .. } => ErrorCategory::Validation,
            IngestError::Database(_) | IngestError::Store { .. } => ErrorCategory::Storage,
            IngestError::ConfigError { .. }
            | IngestError::ConfigValidationError { .. }
            | IngestError::InvalidConfigValueError { .. }
            | IngestError::MissingConfigError { .. } => ErrorCategory::Config,
            IngestError::IoError(_) | IngestError::Scan { .. } => ErrorCategory::System,
        }
    }

    /// 檔案層級的錯誤只影響單一檔案；設定與連線錯誤則讓程序無法啟動
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
            ErrorCategory::Config => ErrorSeverity::Critical,
            ErrorCategory::System => match self {
                IngestError::Scan { .. } => ErrorSeverity::Medium,
                _ => ErrorSeverity::High,
            },
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            IngestError::FileRead { .. } => "Check that the input file exists and is readable",
            IngestError::Parse { .. } => {
                "Fix the malformed record line and drop the file into the input folder again"
            }
            IngestError::QuantityMismatch { .. } => {
                "Make the header Quantity match the number of record lines"
            }
            IngestError::Database(_) | IngestError::Store { .. } => {
                "Check DATABASE_URL and that the database is reachable"
            }
            IngestError::Scan { .. } => "Check that INPUT_FOLDER exists and is readable",
            IngestError::ConfigError { .. }
            | IngestError::ConfigValidationError { .. }
            | IngestError::InvalidConfigValueError { .. }
            | IngestError::MissingConfigError { .. } => {
                "Review the configuration file and environment variables"
            }
            IngestError::IoError(_) => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input file could not be parsed: {}", self),
            ErrorCategory::Validation => format!("Input file failed validation: {}", self),
            ErrorCategory::Storage => format!("Database operation failed: {}", self),
            ErrorCategory::Config => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
