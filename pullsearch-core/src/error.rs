use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Search API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Failure of a single call to the search service.
///
/// The display text of every variant is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("{message}")]
    Rejected { message: String, status_code: u16 },

    /// The request went out but nothing came back (connect error, timeout).
    #[error("No response received from server")]
    NoResponse { details: String },

    /// Anything else, including a body that could not be decoded.
    #[error("An unexpected error occurred")]
    Unexpected { details: String },
}

impl ApiError {
    pub const REJECTED_FALLBACK: &'static str = "API request failed";

    /// Builds a rejection from the service's own message, if it sent one.
    pub fn rejected(message: Option<String>, status_code: u16) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| Self::REJECTED_FALLBACK.to_string());
        ApiError::Rejected {
            message,
            status_code,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8")]
    Encoding,

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
