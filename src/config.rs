// Configuration - Environment variables

use std::env;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_FILE: &str = "/tmp/todolist.log";

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// JSON file the todos are persisted to; in-memory storage when unset
    pub data_file: Option<PathBuf>,
    /// Log file receiving a copy of stdout logging
    pub log_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            data_file: lookup("TODO_DATA_FILE")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            log_file: lookup("LOG_FILE")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }

    /// Warn about settings that are legal but probably unintended
    pub fn validate(&self) -> Result<(), String> {
        if self.data_file.is_none() {
            tracing::warn!("TODO_DATA_FILE not set - todos are kept in memory and lost on restart");
        }
        Ok(())
    }
}
