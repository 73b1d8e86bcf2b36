//! Configuration for the external logging sink.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::PoolError;

/// File open mode for the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenMode {
    /// Append to an existing log file.
    #[serde(rename = "ADDTO")]
    AddTo,
    /// Truncate and write from scratch.
    #[serde(rename = "WRITEONLY")]
    WriteOnly,
}

/// Timestamp format applied to timestamped records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    /// `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "FULLA")]
    FullA,
    /// `YYYY/MM/DD HH:MM:SS`
    #[serde(rename = "FULLB")]
    FullB,
    /// `YYYY-MM-DD`
    #[serde(rename = "YMDA")]
    YmdA,
    /// `YYYY/MM/DD`
    #[serde(rename = "YMDB")]
    YmdB,
    /// `HH:MM:SS`
    #[serde(rename = "TIMEONLY")]
    TimeOnly,
}

impl TimeFormat {
    /// The `chrono` strftime pattern for this format.
    #[must_use]
    pub fn pattern(self) -> &'static str {
        match self {
            Self::FullA => "%Y-%m-%d %H:%M:%S",
            Self::FullB => "%Y/%m/%d %H:%M:%S",
            Self::YmdA => "%Y-%m-%d",
            Self::YmdB => "%Y/%m/%d",
            Self::TimeOnly => "%H:%M:%S",
        }
    }
}

/// Configuration for the file-backed logging sink (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory containing the log file.
    pub log_path: PathBuf,
    /// Log file name, relative to `log_path`.
    pub log_name: String,
    /// Append or truncate on open.
    pub open_mode: OpenMode,
    /// Timestamp format for `emit(text, with_timestamp: true)`.
    pub time_format: TimeFormat,
    /// Whether to rename-and-rotate the file once it exceeds `max_log_size`.
    pub backup: bool,
    /// Rotation threshold, in mebibytes.
    pub max_log_size: u64,
}

impl LogConfig {
    /// Full path to the log file.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.log_path.join(&self.log_name)
    }

    /// Rotation threshold in bytes.
    #[must_use]
    pub fn max_log_size_bytes(&self) -> u64 {
        self.max_log_size * 1024 * 1024
    }

    /// Validates that the log directory exists and the name is non-empty.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.log_name.trim().is_empty() {
            return Err(PoolError::ConfigInvalid("log_name must not be empty".into()));
        }
        if !self.log_path.is_dir() {
            return Err(PoolError::ConfigInvalid(format!(
                "log_path {} is not a directory",
                self.log_path.display()
            )));
        }
        Ok(())
    }

    /// Parses and validates a log configuration document from a JSON string.
    pub fn from_json_str(input: &str) -> Result<Self, PoolError> {
        let config: Self =
            serde_json::from_str(input).map_err(|e| PoolError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a log configuration document from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PoolError> {
        let contents = fs::read_to_string(path).map_err(|e| PoolError::ConfigInvalid(e.to_string()))?;
        Self::from_json_str(&contents)
    }
}
