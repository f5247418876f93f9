//! Configuration for chronoline.
//!
//! The config file is JSON; every field has a default so a partial or
//! missing file still yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::repository::DEFAULT_STORAGE_KEY;
use crate::transfer::ImportPolicy;

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "chronoline";

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the event store lives.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Key (file stem) of the stored event list.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Directory exports are written to.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// How imports treat invalid records.
    #[serde(default)]
    pub import_policy: ImportPolicy,

    /// UI tick interval in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    #[serde(default)]
    pub timeline: TimelineConfig,

    #[serde(default)]
    pub map: MapConfig,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.into()
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_tick_rate_ms() -> u64 {
    250
}

/// Timeline view settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Blank columns kept between items on the same lane.
    #[serde(default = "default_item_margin")]
    pub item_margin: u16,

    /// Initial time scale.
    #[serde(default = "default_days_per_column")]
    pub days_per_column: u32,

    /// Ticks to wait for a newly added item to be drawn before giving up
    /// on focusing it.
    #[serde(default = "default_focus_timeout_ticks")]
    pub focus_timeout_ticks: u32,
}

fn default_item_margin() -> u16 {
    1
}

fn default_days_per_column() -> u32 {
    1
}

fn default_focus_timeout_ticks() -> u32 {
    8
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            item_margin: default_item_margin(),
            days_per_column: default_days_per_column(),
            focus_timeout_ticks: default_focus_timeout_ticks(),
        }
    }
}

/// Map view settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Fixed zoom level; each step halves the visible span.
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

fn default_zoom() -> u8 {
    4
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
        }
    }
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.json")
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration, falling back to defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Path of the log file used while the TUI owns the terminal.
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("chronoline.log")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            export_dir: default_export_dir(),
            import_policy: ImportPolicy::default(),
            tick_rate_ms: default_tick_rate_ms(),
            timeline: TimelineConfig::default(),
            map: MapConfig::default(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
