//! Persisted config (which notes file to use) in the app data directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app_data;

const CONFIG_FILENAME: &str = "config.toml";

/// Used when neither the command line nor the config names a notes file.
pub const DEFAULT_NOTES_FILE: &str = "notes.txt";

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path to the notes file (chosen by the user).
    pub notes_file: Option<String>,
}

/// Path of `config.toml` inside the app data directory.
pub fn config_path() -> Option<PathBuf> {
    app_data::app_data_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// Load config from the app data directory. Returns default config if missing or invalid.
pub fn load_config() -> Config {
    match config_path() {
        Some(path) => load_config_from(&path).unwrap_or_default(),
        None => Config::default(),
    }
}

/// Load config from an explicit file.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
    toml::from_str(&s).map_err(ConfigError::Parse)
}

/// Save config to the app data directory.
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoDataDir)?;
    save_config_to(&path, config)
}

pub fn save_config_to(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let s = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;
    std::fs::write(path, s).map_err(ConfigError::Write)
}

fn configured_notes_file(config: &Config) -> Option<PathBuf> {
    config
        .notes_file
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Set and persist the notes file. Returns the absolute path that was stored.
pub fn set_notes_file(path: &Path) -> Result<PathBuf, ConfigError> {
    let path = absolute_notes_file(path)?;
    let mut config = load_config();
    config.notes_file = Some(path.to_string_lossy().into_owned());
    save_config(&config)?;
    Ok(path)
}

/// Makes `path` absolute without requiring it to exist yet. Rejects directories.
fn absolute_notes_file(path: &Path) -> Result<PathBuf, ConfigError> {
    let path = std::path::absolute(path).map_err(ConfigError::Resolve)?;
    if path.is_dir() {
        return Err(ConfigError::IsADirectory(path));
    }
    Ok(path)
}

/// Picks the notes file: an explicit path wins, then the config, then [DEFAULT_NOTES_FILE].
pub fn resolve_notes_file(explicit: Option<&Path>, config: &Config) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| configured_notes_file(config))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_NOTES_FILE))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine app data directory")]
    NoDataDir,
    #[error("failed to read config: {0}")]
    Read(std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("failed to write config: {0}")]
    Write(std::io::Error),
    #[error("failed to resolve path: {0}")]
    Resolve(std::io::Error),
    #[error("is a directory: {0}")]
    IsADirectory(PathBuf),
}
