//! Game settings and preferences
//!
//! Read separately from levels, from a JSON file in the working directory.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Background music on/off (toggled from the menu)
    pub music_on: bool,
    /// Sound effects on/off
    pub sound_on: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_on: true,
            sound_on: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
        }
    }
}

impl Settings {
    /// File name `load` looks for in the working directory
    pub const FILE_NAME: &'static str = "roguelike_adventure_settings.json";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.clamp_volumes();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from disk, falling back to defaults on any problem
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring bad settings file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Flip music on/off; returns the new value
    pub fn toggle_music(&mut self) -> bool {
        self.music_on = !self.music_on;
        self.music_on
    }

    /// Flip sound effects on/off; returns the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_on = !self.sound_on;
        self.sound_on
    }

    /// Effective effect volume (0 when sound is off)
    pub fn effect_volume(&self) -> f32 {
        if self.sound_on {
            self.master_volume * self.sfx_volume
        } else {
            0.0
        }
    }

    /// Effective music volume before ducking
    pub fn music_level(&self) -> f32 {
        self.master_volume * self.music_volume
    }

    fn clamp_volumes(&mut self) {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_have_everything_on() {
        let settings = Settings::default();
        assert!(settings.music_on);
        assert!(settings.sound_on);
        assert!(settings.effect_volume() > 0.0);
    }

    #[test]
    fn test_toggles() {
        let mut settings = Settings::default();
        assert!(!settings.toggle_sound());
        assert_eq!(settings.effect_volume(), 0.0);
        assert!(settings.toggle_sound());
        assert!(!settings.toggle_music());
        assert!(!settings.music_on);
    }

    #[test]
    fn test_partial_json_fills_defaults_and_clamps() {
        let settings = Settings::from_json(r#"{ "music_on": false, "sfx_volume": 3.0 }"#).unwrap();
        assert!(!settings.music_on);
        assert!(settings.sound_on);
        assert_eq!(settings.sfx_volume, 1.0);
        assert_eq!(settings.master_volume, Settings::default().master_volume);
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.toggle_music();
        settings.music_volume = 0.25;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("roguelike_adventure_no_such_settings.json");
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_load_ignores_retired_keys() {
        let path = std::env::temp_dir().join("roguelike_adventure_retired_keys.json");
        std::fs::write(&path, r#"{ "sound_on": false, "show_score": true }"#).unwrap();
        let settings = Settings::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(!settings.sound_on);
        assert!(!settings.to_json().unwrap().contains("show_score"));
    }
}
