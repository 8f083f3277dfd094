//! # Persistence Module
//!
//! Settings storage for the node: the configured control point and the
//! audible-feedback flag. The core only talks to the [`SettingsStore`]
//! trait; the provided implementation keeps a small TOML file in the
//! user's configuration directory.
//!
//! Storage failures are never fatal. A missing or corrupt file degrades
//! to documented defaults so the node always comes up playable.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::game::settings::ControlPoint;

// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No configuration directory available on this system")]
    NoConfigDir,
}

/// Contract the core expects from non-volatile settings storage.
/// Per-value load/save so a partial failure only degrades that value.
pub trait SettingsStore: Send + 'static {
    fn load_control_point(&self) -> Result<ControlPoint, StorageError>;
    fn save_control_point(&self, control_point: ControlPoint) -> Result<(), StorageError>;
    fn load_beep(&self) -> Result<bool, StorageError>;
    fn save_beep(&self, beep: bool) -> Result<(), StorageError>;
}

// On-disk layout of the settings file
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct StoredSettings {
    control_point: ControlPoint,
    beep: bool,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            control_point: ControlPoint::RECOVERY_DEFAULT,
            beep: true,
        }
    }
}

/// TOML-file backed settings store.
#[derive(Debug, Clone)]
pub struct TomlStore {
    path: PathBuf,
}

impl TomlStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store under `<config dir>/dominion-node/settings.toml`, creating
    /// the directory if needed.
    pub fn at_default_location() -> Result<Self, StorageError> {
        let dir = dirs::config_dir()
            .ok_or(StorageError::NoConfigDir)?
            .join("dominion-node");
        fs::create_dir_all(&dir)?;
        let path = dir.join("settings.toml");
        info!("Using settings file {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read(&self) -> Result<StoredSettings, StorageError> {
        let text = fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Read-modify-write so saving one value keeps the other intact.
    fn update(&self, mutate: impl FnOnce(&mut StoredSettings)) -> Result<(), StorageError> {
        let mut stored = self.read().unwrap_or_default();
        mutate(&mut stored);
        let text = toml::to_string_pretty(&stored)?;
        fs::write(&self.path, text)?;
        debug!("Settings file updated: {:?}", stored);
        Ok(())
    }
}

impl SettingsStore for TomlStore {
    fn load_control_point(&self) -> Result<ControlPoint, StorageError> {
        self.read().map(|stored| stored.control_point)
    }

    fn save_control_point(&self, control_point: ControlPoint) -> Result<(), StorageError> {
        self.update(|stored| stored.control_point = control_point)
    }

    fn load_beep(&self) -> Result<bool, StorageError> {
        self.read().map(|stored| stored.beep)
    }

    fn save_beep(&self, beep: bool) -> Result<(), StorageError> {
        self.update(|stored| stored.beep = beep)
    }
}
