//! Application configuration resolved from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const ENV_API_URL: &str = "BOXOFFICE_API_URL";
pub const ENV_DATA_DIR: &str = "BOXOFFICE_DATA_DIR";
pub const ENV_CATALOG: &str = "BOXOFFICE_CATALOG";
pub const ENV_INITIAL_URL: &str = "BOXOFFICE_INITIAL_URL";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "BOXOFFICE_REQUEST_TIMEOUT_MS";

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_INITIAL_URL: &str = "/";
const DB_FILE_NAME: &str = "boxoffice.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("failed to create data directory {path}: {source}")]
    DataDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub catalog_path: Option<PathBuf>,
    pub initial_url: String,
    /// No timeout unless configured; a stuck booking simply never completes.
    pub request_timeout: Option<Duration>,
}

impl AppConfig {
    /// Load `.env` (if present) and resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("ignoring unreadable .env file: {e}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let api_base_url = value(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: ENV_API_URL,
                reason: format!("'{api_base_url}' is not an http(s) url"),
            });
        }

        let initial_url = value(ENV_INITIAL_URL).unwrap_or_else(|| DEFAULT_INITIAL_URL.to_string());
        if !initial_url.starts_with('/') {
            return Err(ConfigError::Invalid {
                key: ENV_INITIAL_URL,
                reason: format!("'{initial_url}' must be an absolute path"),
            });
        }

        let request_timeout = match value(ENV_REQUEST_TIMEOUT_MS) {
            None => None,
            Some(raw) => {
                let millis: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                    key: ENV_REQUEST_TIMEOUT_MS,
                    reason: format!("'{raw}' is not a number of milliseconds"),
                })?;
                if millis == 0 {
                    return Err(ConfigError::Invalid {
                        key: ENV_REQUEST_TIMEOUT_MS,
                        reason: "timeout must be greater than 0".to_string(),
                    });
                }
                Some(Duration::from_millis(millis))
            }
        };

        Ok(Self {
            api_base_url,
            data_dir: value(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| default_data_dir(&value)),
            catalog_path: value(ENV_CATALOG).map(PathBuf::from),
            initial_url,
            request_timeout,
        })
    }

    /// Path of the SQLite database, creating the data directory if needed.
    pub fn db_path(&self) -> Result<PathBuf, ConfigError> {
        std::fs::create_dir_all(&self.data_dir).map_err(|source| ConfigError::DataDir {
            path: self.data_dir.display().to_string(),
            source,
        })?;
        Ok(self.data_dir.join(DB_FILE_NAME))
    }
}

fn default_data_dir(value: &impl Fn(&str) -> Option<String>) -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(app_data) = value("APPDATA") {
            return PathBuf::from(app_data).join("Boxoffice");
        }
    }

    if let Some(home) = value("HOME") {
        return PathBuf::from(home).join(".boxoffice");
    }

    if let Some(home) = value("USERPROFILE") {
        return PathBuf::from(home).join(".boxoffice");
    }

    PathBuf::from(".boxoffice")
}
