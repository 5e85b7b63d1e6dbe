//! Configuration loading for codetrawl.
//!
//! Layered config: defaults -> config file -> environment variables.
//! Operator-tunable admission values (queue thresholds, load ceiling) are
//! consumed through the `SettingsStore` trait so the backpressure gate
//! can re-read them on every check instead of caching a snapshot.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// Main application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the content index directory
    #[serde(default = "default_index_location")]
    pub index_location: String,

    /// Path to the time index directory
    #[serde(default = "default_time_index_location")]
    pub time_index_location: String,

    /// Maximum number of queued documents before ingestion pauses
    #[serde(default = "default_max_queued_documents")]
    pub max_queued_documents: usize,

    /// Maximum total queued code lines before ingestion pauses
    #[serde(default = "default_max_queued_lines")]
    pub max_queued_lines: i64,

    /// Load-average ceiling above which indexing backs off.
    /// Zero or negative disables the back-off entirely.
    #[serde(default = "default_backoff_load_ceiling")]
    pub backoff_load_ceiling: f64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_index_location() -> String {
    "./index/content".to_string()
}

fn default_time_index_location() -> String {
    "./index/time".to_string()
}

fn default_max_queued_documents() -> usize {
    1000
}

fn default_max_queued_lines() -> i64 {
    1_000_000
}

fn default_backoff_load_ceiling() -> f64 {
    0.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_location: default_index_location(),
            time_index_location: default_time_index_location(),
            max_queued_documents: default_max_queued_documents(),
            max_queued_lines: default_max_queued_lines(),
            backoff_load_ceiling: default_backoff_load_ceiling(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (optional)
    /// 3. Environment variables (`CODETRAWL_*`)
    pub fn load(config_path: Option<&str>) -> Result<Self, TypesError> {
        let mut builder = Config::builder()
            .set_default("index_location", default_index_location())
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("time_index_location", default_time_index_location())
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("max_queued_documents", default_max_queued_documents() as i64)
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("max_queued_lines", default_max_queued_lines())
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("backoff_load_ceiling", default_backoff_load_ceiling())
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| TypesError::Config(e.to_string()))?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("CODETRAWL")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| TypesError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| TypesError::Config(e.to_string()))
    }
}

/// Access to the operator-tunable admission values.
///
/// The backpressure gate consults this on every check, so implementations
/// decide the freshness story: `Settings` hands back its loaded snapshot
/// (fine for tests and embedded use), `FileSettingsStore` re-reads the
/// config source on each call so operators can retune a running system.
pub trait SettingsStore: Send + Sync {
    fn max_queued_documents(&self) -> usize;
    fn max_queued_lines(&self) -> i64;
    fn backoff_load_ceiling(&self) -> f64;
}

impl SettingsStore for Settings {
    fn max_queued_documents(&self) -> usize {
        self.max_queued_documents
    }

    fn max_queued_lines(&self) -> i64 {
        self.max_queued_lines
    }

    fn backoff_load_ceiling(&self) -> f64 {
        self.backoff_load_ceiling
    }
}

/// Settings store that re-reads the config source on every query.
///
/// Falls back to built-in defaults when the file is missing or invalid,
/// so a bad edit never wedges the admission gate.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    config_path: Option<String>,
}

impl FileSettingsStore {
    pub fn new(config_path: Option<String>) -> Self {
        Self { config_path }
    }

    fn current(&self) -> Settings {
        Settings::load(self.config_path.as_deref()).unwrap_or_default()
    }
}

impl SettingsStore for FileSettingsStore {
    fn max_queued_documents(&self) -> usize {
        self.current().max_queued_documents
    }

    fn max_queued_lines(&self) -> i64 {
        self.current().max_queued_lines
    }

    fn backoff_load_ceiling(&self) -> f64 {
        self.current().backoff_load_ceiling
    }
}
