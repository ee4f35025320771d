//! Application settings, read from an optional TOML file.
//!
//! Every field has a default so an absent file, or a file that only sets a
//! few keys, still yields a usable configuration.

use crate::error::ConfigError;
use crate::types::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const CONFIG_ENV_VAR: &str = "PULLSEARCH_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "pullsearch.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_page_size: u32,
    pub default_page_size: u32,
    pub export_dir: PathBuf,
    pub export_file_name: String,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.pullpush.io/reddit/search".to_string(),
            user_agent: "Reddit-Search-App/1.0.0".to_string(),
            timeout_secs: 10,
            max_page_size: MAX_PAGE_SIZE,
            default_page_size: DEFAULT_PAGE_SIZE,
            export_dir: PathBuf::from("."),
            export_file_name: "reddit_search_results.csv".to_string(),
            log_filter: "pullsearch=info,gui=info,pullsearch_client=info,pullsearch_core=info"
                .to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::Read {
                    path: path.display().to_string(),
                    source: e,
                }
            }
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Reads the file named by `PULLSEARCH_CONFIG`, or `pullsearch.toml` in
    /// the working directory. Only the default location may be missing.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Self::load_or_default(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }

    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::from_file(path) {
            Err(ConfigError::FileNotFound { .. }) => {
                info!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(invalid("api_base_url", &self.api_base_url));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", self.timeout_secs));
        }
        if self.max_page_size == 0 {
            return Err(invalid("max_page_size", self.max_page_size));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(invalid("default_page_size", self.default_page_size));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(invalid("export_file_name", &self.export_file_name));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(&self.export_file_name)
    }
}

fn invalid(field: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}
