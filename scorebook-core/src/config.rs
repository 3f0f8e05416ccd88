//! Configuration for the scorebook

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Scorebook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the game state and history files
    pub data_dir: PathBuf,

    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// File layout
    pub storage: StorageConfig,

    /// Undo history configuration
    pub history: HistoryConfig,

    /// Intermission clock configuration
    pub clock: ClockConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/scorebook"),
            service_name: "scorebook".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            storage: StorageConfig::default(),
            history: HistoryConfig::default(),
            clock: ClockConfig::default(),
        }
    }
}

/// Persisted file names, relative to `data_dir`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Current game state
    pub stats_file: String,

    /// Undo snapshots
    pub history_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            stats_file: "basketball_stats.json".to_string(),
            history_file: "action_history.json".to_string(),
        }
    }
}

/// Undo history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of snapshots kept (oldest evicted first)
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_entries: 50 }
    }
}

/// Intermission clock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Length of one countdown tick (milliseconds)
    pub tick_ms: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { tick_ms: 1000 }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(data_dir) = std::env::var("SCOREBOOK_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(max) = std::env::var("SCOREBOOK_MAX_HISTORY") {
            config.history.max_entries = max.parse().map_err(|e| {
                crate::Error::Config(format!("SCOREBOOK_MAX_HISTORY={}: {}", max, e))
            })?;
        }

        if let Ok(tick) = std::env::var("SCOREBOOK_CLOCK_TICK_MS") {
            config.clock.tick_ms = tick.parse().map_err(|e| {
                crate::Error::Config(format!("SCOREBOOK_CLOCK_TICK_MS={}: {}", tick, e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Path of the game state file
    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join(&self.storage.stats_file)
    }

    /// Path of the history file
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.storage.history_file)
    }

    fn validate(&self) -> crate::Result<()> {
        if self.history.max_entries == 0 {
            return Err(crate::Error::Config(
                "history.max_entries must be at least 1".to_string(),
            ));
        }
        if self.clock.tick_ms == 0 {
            return Err(crate::Error::Config(
                "clock.tick_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
