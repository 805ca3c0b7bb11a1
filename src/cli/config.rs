//! Connector configuration file
//!
//! ```json
//! {
//!   "credentials": {
//!     "apiEndpoint": "https://cloud.appwrite.io/v1",
//!     "projectId": "5f9a8b7c6d5e",
//!     "databaseId": "main",
//!     "apiKey": "..."
//!   },
//!   "timeoutSecs": 30,
//!   "logLevel": "info",
//!   "logFormat": "text"
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::client::CredentialSet;
use crate::observability::LogFormat;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorConfig {
    /// Backend credentials (required)
    pub credentials: CredentialSet,

    /// Per-request timeout in seconds (optional, default 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log filter directive (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log line format (optional, default "text")
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ConnectorConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: ConnectorConfig = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> CliResult<()> {
        self.credentials
            .validate()
            .map_err(|e| CliError::config_error(e.to_string()))?;

        if self.timeout_secs == 0 {
            return Err(CliError::config_error("timeoutSecs must be > 0"));
        }

        if self.log_level.trim().is_empty() {
            return Err(CliError::config_error("logLevel must not be empty"));
        }

        Ok(())
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
