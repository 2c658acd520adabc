//! Game settings and preferences
//!
//! Stored as a JSON file next to the binary. Missing fields fall back to
//! defaults, and a missing or unreadable file falls back to `Settings::default()`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Character;
use crate::tuning::Tuning;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON")]
    Parse(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Character preselected on the select screen
    pub character: Character,
    /// Fixed session seed; a time-based seed is used when absent
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,

    // === Gameplay ===
    /// Balance overrides, including the contact and row-assist toggles
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            character: Character::Yellow,
            seed: None,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,

            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, tolerating a missing or broken file
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn effective_sfx_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    pub fn effective_music_volume(&self) -> f32 {
        (self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("vacpop-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_round_trip_file() {
        let path = temp_path("round-trip");
        let mut settings = Settings::default();
        settings.character = Character::Green;
        settings.seed = Some(42);
        settings.tuning.shot_cooldown = 0.25;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "seed": 7, "tuning": { "burst_spread": 20.0 } }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.character, Character::Yellow);
        assert_eq!(settings.tuning.burst_spread, 20.0);
        assert_eq!(settings.tuning.shot_cooldown, 0.4);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = temp_path("missing");
        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Io { .. })
        ));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let path = temp_path("bad");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::load_from(&path),
            Err(SettingsError::Parse(_))
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_gameplay_toggles_load_from_tuning() {
        let settings: Settings =
            serde_json::from_str(r#"{ "tuning": { "row_gated_contact": false, "projectile_row_assist": false } }"#)
                .unwrap();
        assert!(!settings.tuning.row_gated_contact);
        assert!(!settings.tuning.projectile_row_assist);
        assert_eq!(settings.tuning.shot_cooldown, Tuning::default().shot_cooldown);

        let path = temp_path("toggles");
        settings.save_to(&path).unwrap();
        let json = fs::read_to_string(&path).unwrap();
        assert_eq!(json.matches("row_gated_contact").count(), 1);
        let loaded = Settings::load_from(&path).unwrap();
        assert!(!loaded.tuning.row_gated_contact);
        assert!(!loaded.tuning.projectile_row_assist);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_effective_volumes() {
        let mut settings = Settings::default();
        settings.master_volume = 0.5;
        settings.sfx_volume = 0.5;
        assert_eq!(settings.effective_sfx_volume(), 0.25);
        assert_eq!(settings.effective_music_volume(), 0.35);
    }
}
