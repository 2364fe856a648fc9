//! Data-driven configuration
//!
//! - [`levels`]: the level catalog (`assets/config/levels.json`)
//! - [`entities`]: per-kind character and turret stats (`assets/config/entities.json`)
//! - [`settings`]: user settings persisted in the platform config directory
//!
//! Everything here is plain serde data. Loading fails fast with a
//! [`ConfigError`](crate::error::ConfigError) naming the offending file.

pub mod entities;
pub mod levels;
pub mod settings;

pub use entities::{CharacterStats, EnemyKind, StatTable, TurretStats};
pub use levels::{LevelCatalog, LevelConfig};
pub use settings::{RESOLUTION_OPTIONS, Resolution, Settings, SettingsStore};

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Reads and parses a JSON file, attaching the path to any error.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&content, path)
}

pub(crate) fn parse_json<T: DeserializeOwned>(content: &str, origin: &Path) -> Result<T, ConfigError> {
    serde_json::from_str(content).map_err(|source| ConfigError::Json {
        path: origin.to_path_buf(),
        source,
    })
}
