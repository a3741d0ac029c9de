use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status} for {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RosterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RosterError::ApiError(_) | RosterError::HttpStatus { .. } => ErrorCategory::Network,
            RosterError::ConfigError { .. }
            | RosterError::MissingConfigError { .. }
            | RosterError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RosterError::CsvError(_)
            | RosterError::SerializationError(_)
            | RosterError::ProcessingError { .. } => ErrorCategory::Data,
            RosterError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 只有可重試的網路錯誤算 Medium
            ErrorCategory::Network if self.is_retryable() => ErrorSeverity::Medium,
            ErrorCategory::Network => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 是否值得重試 (僅限網路錯誤及 5xx / 429 回應)
    pub fn is_retryable(&self) -> bool {
        match self {
            RosterError::ApiError(e) => !e.is_decode(),
            RosterError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// CLI 退出碼: 1 設定/資料/不可重試, 2 可重試網路錯誤, 3 系統 (IO) 錯誤
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RosterError::ApiError(_) => "Check network connectivity and that the endpoint is reachable",
            RosterError::HttpStatus { .. } => "Verify the endpoint URL and that the service is healthy",
            RosterError::CsvError(_) => "Make sure the CSV file has a first_name,last_name header",
            RosterError::IoError(_) => "Check that the file exists and the path is writable",
            RosterError::SerializationError(_) | RosterError::ProcessingError { .. } => {
                "Make sure the source returns user objects with first_name and last_name"
            }
            RosterError::ConfigError { .. }
            | RosterError::MissingConfigError { .. }
            | RosterError::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not fetch users: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Could not read user data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
