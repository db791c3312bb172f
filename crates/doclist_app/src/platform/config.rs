//! Optional RON configuration for the terminal front end.
//!
//! Looks for `./doclist.ron`, or the file named by `DOCLIST_CONFIG`. Every
//! field is optional; a missing file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use doclist_engine::{EngineSettings, RepositorySettings, DEFAULT_SEARCH_DEBOUNCE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ENV: &str = "DOCLIST_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "doclist.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub search_debounce_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// Mirror the log file on stderr.
    pub log_to_terminal: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let repository = RepositorySettings::default();
        Self {
            base_url: repository.base_url,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE.as_millis() as u64,
            connect_timeout_ms: repository.connect_timeout.as_millis() as u64,
            request_timeout_ms: repository.request_timeout.as_millis() as u64,
            log_to_terminal: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

impl AppConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            repository: RepositorySettings {
                base_url: self.base_url.clone(),
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                request_timeout: Duration::from_millis(self.request_timeout_ms),
                ..RepositorySettings::default()
            },
            search_debounce: Duration::from_millis(self.search_debounce_ms),
        }
    }
}

pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// `Ok(None)` when the file does not exist.
pub fn load_from(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
