//! User settings and their on-disk store
//!
//! This module provides the `SettingsStore`, which handles:
//! - Locating the settings file in the platform config directory
//! - Loading settings, falling back to defaults when the file is missing or broken
//! - Saving settings as pretty JSON

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Window size choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Resolution {
    Windowed(u32, u32),
    Fullscreen,
}

/// Choices offered by the settings menu, in cycling order
pub const RESOLUTION_OPTIONS: [Resolution; 4] = [
    Resolution::Windowed(800, 600),
    Resolution::Windowed(1280, 720),
    Resolution::Windowed(1024, 768),
    Resolution::Fullscreen,
];

impl Resolution {
    /// Logical drawing size; fullscreen uses the desktop size
    pub fn size(&self, desktop: (u32, u32)) -> (u32, u32) {
        match *self {
            Resolution::Windowed(w, h) => (w, h),
            Resolution::Fullscreen => desktop,
        }
    }

    /// Next option in [`RESOLUTION_OPTIONS`] (wrapping); unknown sizes restart the cycle
    pub fn next(&self) -> Resolution {
        let index = RESOLUTION_OPTIONS.iter().position(|r| r == self);
        match index {
            Some(i) => RESOLUTION_OPTIONS[(i + 1) % RESOLUTION_OPTIONS.len()],
            None => RESOLUTION_OPTIONS[0],
        }
    }

    pub fn previous(&self) -> Resolution {
        let len = RESOLUTION_OPTIONS.len();
        let index = RESOLUTION_OPTIONS.iter().position(|r| r == self);
        match index {
            Some(i) => RESOLUTION_OPTIONS[(i + len - 1) % len],
            None => RESOLUTION_OPTIONS[0],
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Windowed(w, h) => write!(f, "{}x{}", w, h),
            Resolution::Fullscreen => write!(f, "FULL"),
        }
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Resolution {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case("full") {
            return Ok(Resolution::Fullscreen);
        }
        let (w, h) = value
            .split_once('x')
            .ok_or_else(|| format!("invalid resolution '{}'", value))?;
        let w = w.trim().parse().map_err(|_| format!("invalid width in '{}'", value))?;
        let h = h.trim().parse().map_err(|_| format!("invalid height in '{}'", value))?;
        Ok(Resolution::Windowed(w, h))
    }
}

/// Persisted user settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 0.0 - 1.0
    pub music_volume: f32,
    /// 0.0 - 1.0
    pub fx_volume: f32,
    pub resolution: Resolution,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            music_volume: 0.5,
            fx_volume: 0.5,
            resolution: Resolution::Windowed(800, 600),
        }
    }
}

impl Settings {
    /// Clamps volumes into range after loading or editing
    pub fn normalized(mut self) -> Self {
        self.music_volume = round_volume(self.music_volume);
        self.fx_volume = round_volume(self.fx_volume);
        self
    }
}

/// Clamps to `[0, 1]` and snaps to one decimal so repeated 0.1 steps stay exact
pub fn round_volume(volume: f32) -> f32 {
    (volume.clamp(0.0, 1.0) * 10.0).round() / 10.0
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub const FILE_NAME: &'static str = "settings.json";

    /// Creates a store in `directory`, creating the directory if needed.
    pub fn new(directory: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = directory.as_ref().to_path_buf();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(SettingsStore {
            path: dir.join(Self::FILE_NAME),
        })
    }

    /// Store under the platform config directory (`~/.config/nhembi_survivor` on Linux)
    pub fn default_location() -> Result<Self, ConfigError> {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        SettingsStore::new(base.join("nhembi_survivor"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads settings; a missing or malformed file yields the defaults.
    pub fn load(&self) -> Settings {
        if !self.path.exists() {
            info!("no settings at {}, using defaults", self.path.display());
            return Settings::default();
        }

        let parsed = fs::read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|json| serde_json::from_str::<Settings>(&json).map_err(|e| e.to_string()));

        match parsed {
            Ok(settings) => settings.normalized(),
            Err(err) => {
                error!("could not load {}: {}; using defaults", self.path.display(), err);
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<PathBuf, ConfigError> {
        let json = serde_json::to_string_pretty(settings).map_err(|source| ConfigError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!("settings saved to {}", self.path.display());
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "nhembi_settings_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.music_volume, 0.5);
        assert_eq!(settings.fx_volume, 0.5);
        assert_eq!(settings.resolution, Resolution::Windowed(800, 600));
    }

    #[test]
    fn test_resolution_string_round_trip() {
        assert_eq!(Resolution::try_from("1280x720".to_string()), Ok(Resolution::Windowed(1280, 720)));
        assert_eq!(Resolution::try_from("FULL".to_string()), Ok(Resolution::Fullscreen));
        assert!(Resolution::try_from("huge".to_string()).is_err());
        assert_eq!(String::from(Resolution::Windowed(1024, 768)), "1024x768");
    }

    #[test]
    fn test_resolution_cycles_through_options() {
        let mut r = Resolution::Windowed(800, 600);
        let mut seen = Vec::new();
        for _ in 0..RESOLUTION_OPTIONS.len() {
            r = r.next();
            seen.push(r);
        }
        assert_eq!(seen.last(), Some(&Resolution::Windowed(800, 600)));
        assert!(seen.contains(&Resolution::Fullscreen));
        assert_eq!(Resolution::Fullscreen.previous(), Resolution::Windowed(1024, 768));
        assert_eq!(Resolution::Fullscreen.size((1920, 1080)), (1920, 1080));
    }

    #[test]
    fn test_save_then_load() {
        let store = SettingsStore::new(scratch_dir("roundtrip")).unwrap();
        let settings = Settings {
            music_volume: 0.2,
            fx_volume: 0.9,
            resolution: Resolution::Fullscreen,
        };

        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn test_missing_and_malformed_files_fall_back_to_defaults() {
        let store = SettingsStore::new(scratch_dir("fallback")).unwrap();
        assert_eq!(store.load(), Settings::default());

        fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_partial_file_and_clamping() {
        let store = SettingsStore::new(scratch_dir("partial")).unwrap();
        fs::write(store.path(), r#"{ "fx_volume": 3.0 }"#).unwrap();

        let settings = store.load();
        assert_eq!(settings.fx_volume, 1.0);
        assert_eq!(settings.music_volume, 0.5);
    }
}
