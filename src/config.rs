//! Configuration file support for roistudio.
//!
//! Settings are stored as versioned JSON. Every section falls back to its
//! defaults when missing, so older files keep loading.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::builder::DraftDefaults;
use crate::constants::{
    DEFAULT_NEGATIVE_THRESHOLD, DEFAULT_POSITIVE_THRESHOLD, DEFAULT_PROVISIONING_DELAY_MS,
    DEFAULT_TASK_DURATION_SECS, DEFAULT_TRAINING_DELAY_MS,
};
use crate::lifecycle::LifecycleTimings;
use crate::model::AlarmLevel;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// All log levels from least to most verbose.
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    #[serde(default)]
    pub preferences: UserPreferences,

    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    #[serde(default)]
    pub curation: CurationConfig,

    #[serde(default)]
    pub draft: DraftConfig,
}

/// User preferences section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Simulated delays of the task lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// INIT to RUNNING delay
    #[serde(default = "default_provisioning_delay_ms")]
    pub provisioning_delay_ms: u64,

    /// TRAINING to RUNNING delay
    #[serde(default = "default_training_delay_ms")]
    pub training_delay_ms: u64,
}

fn default_provisioning_delay_ms() -> u64 {
    DEFAULT_PROVISIONING_DELAY_MS
}

fn default_training_delay_ms() -> u64 {
    DEFAULT_TRAINING_DELAY_MS
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            provisioning_delay_ms: default_provisioning_delay_ms(),
            training_delay_ms: default_training_delay_ms(),
        }
    }
}

impl LifecycleConfig {
    pub fn timings(&self) -> LifecycleTimings {
        LifecycleTimings {
            provisioning: Duration::from_millis(self.provisioning_delay_ms),
            training: Duration::from_millis(self.training_delay_ms),
        }
    }
}

/// Training gate thresholds seeded into new drafts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurationConfig {
    #[serde(default = "default_positive_threshold")]
    pub positive_threshold: usize,

    #[serde(default = "default_negative_threshold")]
    pub negative_threshold: usize,
}

fn default_positive_threshold() -> usize {
    DEFAULT_POSITIVE_THRESHOLD
}

fn default_negative_threshold() -> usize {
    DEFAULT_NEGATIVE_THRESHOLD
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            positive_threshold: default_positive_threshold(),
            negative_threshold: default_negative_threshold(),
        }
    }
}

/// Alarm settings seeded into new drafts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftConfig {
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,

    #[serde(default)]
    pub alarm_level: AlarmLevel,
}

fn default_duration_secs() -> u32 {
    DEFAULT_TASK_DURATION_SECS
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            alarm_level: AlarmLevel::default(),
        }
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: UserPreferences::default(),
            lifecycle: LifecycleConfig::default(),
            curation: CurationConfig::default(),
            draft: DraftConfig::default(),
        }
    }

    /// Starting values for a new task draft.
    pub fn draft_defaults(&self) -> DraftDefaults {
        DraftDefaults {
            duration_secs: self.draft.duration_secs,
            alarm_level: self.draft.alarm_level,
            positive_threshold: self.curation.positive_threshold,
            negative_threshold: self.curation.negative_threshold,
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Default config filename.
    pub fn default_filename() -> &'static str {
        "roistudio-config.json"
    }

    /// Default config file path for auto-load/save.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("roistudio").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("roistudio")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(&path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
