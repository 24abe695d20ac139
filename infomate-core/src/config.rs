//! # Configuration Management
//!
//! Handles configuration for the InfoMate stores and their front ends.
//! Every section has a `Default`, and sections missing from a config file
//! fall back to it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Blob key of the analysis history snapshot
pub const HISTORY_STORAGE_KEY: &str = "infomate_analysis_history";
/// Blob key of the evaluation snapshot
pub const EVALUATION_STORAGE_KEY: &str = "infomate_evaluations";
/// Blob key of the report snapshot
pub const REPORT_STORAGE_KEY: &str = "infomate_reports";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub index: IndexConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| Error::Configuration {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| Error::Configuration {
            message: format!("cannot parse {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.index.bucket_count == 0 {
            return Err(Error::Configuration {
                message: "index.bucket_count must be positive".to_string(),
            });
        }
        let keys = [
            &self.storage.history_key,
            &self.storage.evaluation_key,
            &self.storage.report_key,
        ];
        if keys.iter().any(|k| k.trim().is_empty()) {
            return Err(Error::Configuration {
                message: "storage keys must not be empty".to_string(),
            });
        }
        if keys[0] == keys[1] || keys[0] == keys[2] || keys[1] == keys[2] {
            return Err(Error::Configuration {
                message: "storage keys must be distinct".to_string(),
            });
        }
        Ok(())
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub history_key: String,
    pub evaluation_key: String,
    pub report_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            history_key: HISTORY_STORAGE_KEY.to_string(),
            evaluation_key: EVALUATION_STORAGE_KEY.to_string(),
            report_key: REPORT_STORAGE_KEY.to_string(),
        }
    }
}

/// Index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Fixed number of hash buckets; the table never resizes
    pub bucket_count: usize,
    pub sort_algorithm: SortAlgorithm,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            bucket_count: 100,
            sort_algorithm: SortAlgorithm::Partition,
        }
    }
}

/// Sorting algorithms for record views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
    /// Three-way partition quicksort, not order-preserving
    #[default]
    Partition,
    /// Mergesort, keeps equal elements in input order
    Merge,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
        }
    }
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}
