use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn is_retryable(&self) -> bool;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Api(e) => {
                error!("Search API error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            CoreError::Export(e) => {
                error!("Export error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_retryable(),
            CoreError::Network(_) => true,
            _ => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Api(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Export(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::Io(e) => format!("System error: {}", e),
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Api(_) => "SEARCH_API".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Export(_) => "EXPORT".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }
}

impl ErrorExt for ApiError {
    fn log_error(&self) -> &Self {
        match self {
            ApiError::Rejected { status_code, .. } => {
                error!("ApiError: {} (status {})", self, status_code)
            }
            ApiError::NoResponse { details } | ApiError::Unexpected { details } => {
                error!("ApiError: {} ({})", self, details)
            }
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ApiError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            ApiError::Rejected { status_code, .. } => *status_code == 429 || *status_code >= 500,
            ApiError::NoResponse { .. } => true,
            ApiError::Unexpected { .. } => false,
        }
    }

    // The search banner shows the service's own wording.
    fn user_friendly_message(&self) -> String {
        self.message()
    }

    fn error_code(&self) -> String {
        match self {
            ApiError::Rejected { .. } => "API_REJECTED".to_string(),
            ApiError::NoResponse { .. } => "API_NO_RESPONSE".to_string(),
            ApiError::Unexpected { .. } => "API_UNEXPECTED".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
            ConfigError::Read { .. } => {
                "Configuration file could not be read. Please check file permissions."
                    .to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::Read { .. } => "CONFIG_READ_FAILED".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

impl ErrorExt for ExportError {
    fn log_error(&self) -> &Self {
        error!("ExportError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ExportError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        matches!(self, ExportError::Write { .. })
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ExportError::Write { path, .. } => {
                format!("Could not save results to {}.", path.display())
            }
            _ => "Could not encode results as CSV.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            ExportError::Csv(_) => "EXPORT_CSV".to_string(),
            ExportError::Encoding => "EXPORT_ENCODING".to_string(),
            ExportError::Write { .. } => "EXPORT_WRITE".to_string(),
        }
    }
}

/// Logs errors raised by one component together with their code and the
/// message shown to the user.
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    component: &'static str,
}

impl ErrorReporter {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        info!(
            "[{}] error code: {}, user message: {}",
            self.component,
            error.error_code(),
            error.user_friendly_message()
        );
        if error.is_retryable() {
            info!("[{}] error is retryable by submitting the search again", self.component);
        }
    }

    /// Failures the interface recovers from on its own.
    pub fn report_warning(&self, error: &CoreError) {
        error.log_warn();
        info!("[{}] warning code: {}", self.component, error.error_code());
    }
}
