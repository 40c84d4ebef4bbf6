use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("{service} responded with {status}: {body}")]
    UpstreamError {
        service: String,
        status: u16,
        body: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required setting: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Nothing to process: {message}")]
    NoInputError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Upstream,
    FileSystem,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HarvestError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) => ErrorCategory::Network,
            Self::UpstreamError { .. } => ErrorCategory::Upstream,
            Self::IoError(_) => ErrorCategory::FileSystem,
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::NoInputError { .. }
            | Self::ProcessingError { .. } => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // a flaky endpoint is worth re-running
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::FileSystem => ErrorSeverity::Critical,
        }
    }

    /// Exit status a binary should terminate with for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ApiError(_) => {
                "Check your network connection and that the API host is reachable".to_string()
            }
            Self::UpstreamError { status, .. } if *status == 401 || *status == 403 => {
                "The API key was rejected; pass a valid key with --api-key or in .env".to_string()
            }
            Self::UpstreamError { status, .. } if *status == 429 => {
                "Rate limited; raise --delay-ms and retry".to_string()
            }
            Self::UpstreamError { .. } => "The remote service failed; retry later".to_string(),
            Self::IoError(_) => "Check that the paths exist and are writable".to_string(),
            Self::CsvError(_) => "Check the CSV file's header and encoding".to_string(),
            Self::SerializationError(_) => "The JSON input is malformed".to_string(),
            Self::MissingConfigError { field } => format!(
                "Provide {} on the command line, in the environment or in a .env file",
                field
            ),
            Self::InvalidConfigValueError { field, .. } => {
                format!("Correct the value given for {}", field)
            }
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Review the configuration file".to_string()
            }
            Self::NoInputError { message } if message.contains("URLs") => {
                "Add at least one URL to the file or pass URLs on the command line".to_string()
            }
            Self::NoInputError { .. } => {
                "Run the scraper first or point --dir at a directory with .md files".to_string()
            }
            Self::ProcessingError { .. } => "Re-run with --verbose for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingConfigError { field } => format!("{} is required", field),
            Self::UpstreamError {
                service, status, ..
            } => format!("{} request failed with HTTP {}", service, status),
            Self::NoInputError { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;

/// Report `err` to the log and the terminal, then exit with its status.
pub fn exit_with(err: &HarvestError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        err,
        err.category(),
        err.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", err.recovery_suggestion());

    eprintln!("❌ {}", err.user_friendly_message());
    eprintln!("💡 {}", err.recovery_suggestion());
    std::process::exit(err.exit_code().max(1))
}
