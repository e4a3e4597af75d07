//! Shell configuration loaded from TOML.

use crate::games::reversi::Player;
use crate::storage::{self, GameStorage, StorageError};
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Durable backend for named clashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One text file per clash.
    #[default]
    Files,
    /// One SQLite database for all clashes.
    Sqlite,
}

/// Configuration for the reversi shell.
#[derive(Debug, Clone, Getters, Setters, Deserialize)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct ReversiConfig {
    /// Directory for the text-file backend.
    games_dir: PathBuf,

    /// Which durable backend to use.
    backend: Backend,

    /// Database file for the SQLite backend.
    database: PathBuf,

    /// Side taken by `new` when no glyph is given.
    first_player: Player,

    /// Colour highlighting in board output.
    color: bool,
}

impl Default for ReversiConfig {
    fn default() -> Self {
        Self {
            games_dir: PathBuf::from("games"),
            backend: Backend::Files,
            database: PathBuf::from("reversi.db"),
            first_player: Player::Black,
            color: true,
        }
    }
}

impl ReversiConfig {
    /// Loads configuration from a TOML file. Missing keys keep defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(backend = ?config.backend, "Config loaded successfully");
        Ok(config)
    }

    /// Opens the configured durable backend.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory or database cannot be opened.
    #[instrument(skip(self), fields(backend = ?self.backend))]
    pub fn open_storage(&self) -> Result<GameStorage, StorageError> {
        match self.backend {
            Backend::Files => storage::text_file_storage(&self.games_dir),
            Backend::Sqlite => storage::sqlite_storage(self.database.to_string_lossy()),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
