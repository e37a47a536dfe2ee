//! Game settings and preferences
//!
//! Persisted as JSON next to the high score file. A missing or corrupt file
//! falls back to defaults.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Failure reading or writing the settings file
#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "settings I/O error: {e}"),
            SettingsError::Json(e) => write!(f, "settings format error: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(e: io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background music on/off (the options and pause menu toggle)
    pub music_on: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Visual Effects ===
    /// Screen shake on explosions/impacts
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (disables shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_on: true,
            music_volume: 0.7,
            sfx_volume: 1.0,
            screen_shake: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    pub fn toggle_music(&mut self) -> bool {
        self.music_on = !self.music_on;
        self.music_on
    }

    /// Read settings, reporting why they could not be read
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let mut settings: Settings = serde_json::from_str(&json)?;
        settings.music_volume = settings.music_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Load settings from disk, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn try_save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Save settings to disk; failures are logged and otherwise ignored
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match self.try_save(path) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings to {}: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("star-sentinel-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut s = Settings::default();
        assert!(s.effective_screen_shake());
        s.reduced_motion = true;
        assert!(!s.effective_screen_shake());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("settings-save.json");
        let mut s = Settings::default();
        s.toggle_music();
        s.sfx_volume = 0.25;
        s.try_save(&path).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded, s);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_or_corrupt_file_gives_defaults() {
        let missing = temp_path("settings-missing.json");
        let _ = fs::remove_file(&missing);
        assert_eq!(Settings::load(&missing), Settings::default());
        assert!(matches!(Settings::try_load(&missing), Err(SettingsError::Io(_))));

        let corrupt = temp_path("settings-corrupt.json");
        fs::write(&corrupt, "{ not json").unwrap();
        assert_eq!(Settings::load(&corrupt), Settings::default());
        assert!(matches!(Settings::try_load(&corrupt), Err(SettingsError::Json(_))));
        let _ = fs::remove_file(&corrupt);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("settings-partial.json");
        fs::write(&path, r#"{ "music_on": false, "sfx_volume": 4.0 }"#).unwrap();
        let s = Settings::load(&path);
        assert!(!s.music_on);
        assert_eq!(s.sfx_volume, 1.0);
        assert!(s.screen_shake);
        let _ = fs::remove_file(&path);
    }
}
