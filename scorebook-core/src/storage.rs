//! Storage layer using two JSON files
//!
//! # Files
//!
//! - game state (`basketball_stats.json`) - the current [`GameState`]
//! - history (`action_history.json`) - undo snapshots, oldest first
//!
//! The two files are independent: either one may be missing or corrupt
//! without affecting the other. Writes go to a temporary sibling that is then
//! renamed over the target, so a crash mid-write leaves the previous file
//! intact.

use crate::{
    error::{Error, Result},
    history::History,
    types::GameState,
    Config,
};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed storage for the game state and the undo history
#[derive(Debug, Clone)]
pub struct Storage {
    stats_path: PathBuf,
    history_path: PathBuf,
}

impl Storage {
    /// Open storage, creating the data directory if needed
    pub fn open(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let storage = Self {
            stats_path: config.stats_path(),
            history_path: config.history_path(),
        };

        tracing::info!(
            stats = %storage.stats_path.display(),
            history = %storage.history_path.display(),
            "Opened scorebook storage"
        );

        Ok(storage)
    }

    /// Game state file
    pub fn stats_path(&self) -> &Path {
        &self.stats_path
    }

    /// History file
    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    // Game state

    /// Read the game state
    ///
    /// A missing file surfaces as `Error::Io` with `NotFound`; a document that
    /// does not parse or lacks a required key surfaces as
    /// `Error::Serialization`.
    pub fn load_state(&self) -> Result<GameState> {
        let bytes = std::fs::read(&self.stats_path)?;
        let state: GameState = serde_json::from_slice(&bytes)?;
        tracing::debug!(path = %self.stats_path.display(), "Game state loaded");
        Ok(state)
    }

    /// Write the game state
    pub fn save_state(&self, state: &GameState) -> Result<()> {
        write_json(&self.stats_path, state)
    }

    // History

    /// Read the persisted undo snapshots, oldest first
    pub fn load_history(&self) -> Result<Vec<GameState>> {
        let bytes = std::fs::read(&self.history_path)?;
        let snapshots: Vec<GameState> = serde_json::from_slice(&bytes)?;
        tracing::debug!(
            path = %self.history_path.display(),
            snapshots = snapshots.len(),
            "History loaded"
        );
        Ok(snapshots)
    }

    /// Write the undo snapshots
    pub fn save_history(&self, history: &History) -> Result<()> {
        let snapshots: Vec<&GameState> = history.snapshots().collect();
        write_json(&self.history_path, &snapshots)
    }

    /// Delete both files (missing files are fine)
    pub fn clear(&self) -> Result<()> {
        for path in [&self.stats_path, &self.history_path] {
            match std::fs::remove_file(path) {
                Ok(()) => tracing::debug!(path = %path.display(), "Removed"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(Error::Io(e)),
            }
        }
        Ok(())
    }
}

/// Serialize `value` to `path` via a temporary sibling and a rename
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, &bytes)?;
    std::fs::rename(&tmp, path)?;

    tracing::trace!(path = %path.display(), bytes = bytes.len(), "File written");
    Ok(())
}

/// Whether a load error only means the file does not exist yet
pub fn is_missing(err: &Error) -> bool {
    matches!(err, Error::Io(e) if e.kind() == ErrorKind::NotFound)
}
