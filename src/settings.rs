//! Game settings and preferences
//!
//! Persisted as JSON, separately from save games.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::TICKS_PER_SECOND;
use crate::error::SettingsError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Player ===
    /// Name results are recorded under
    pub player_name: String,

    // === Files ===
    pub leaderboard_path: PathBuf,
    /// Where save games are written
    pub saves_dir: PathBuf,
    /// Abort level loads on the first malformed line instead of skipping it
    pub strict_level_files: bool,

    // === Simulation ===
    pub ticks_per_second: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            // Player
            player_name: "player".to_string(),

            // Files
            leaderboard_path: PathBuf::from("data.txt"),
            saves_dir: PathBuf::from("saves"),
            strict_level_files: false,

            // Simulation
            ticks_per_second: TICKS_PER_SECOND,
        }
    }
}

impl Settings {
    /// Effective effect volume (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        self.mixed(self.sfx_volume)
    }

    /// Effective music volume (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        self.mixed(self.music_volume)
    }

    fn mixed(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * channel.clamp(0.0, 1.0)
        }
    }

    /// Fixed timestep derived from `ticks_per_second`
    pub fn sim_dt(&self) -> f32 {
        1.0 / self.ticks_per_second.max(1) as f32
    }

    /// Save games named by a relative path live under `saves_dir`
    pub fn save_file(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.saves_dir.join(path)
        }
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("Using default settings ({}: {e})", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to `path` as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, json).map_err(io_err)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::temp_path;

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(&temp_path("no-settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("settings.json");
        let settings = Settings {
            player_name: "alice".to_string(),
            muted: true,
            strict_level_files: true,
            ..Default::default()
        };
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial.json");
        fs::write(&path, r#"{ "player_name": "bob", "music_volume": 0.2 }"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.player_name, "bob");
        assert_eq!(settings.music_volume, 0.2);
        assert_eq!(settings.ticks_per_second, TICKS_PER_SECOND);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let path = temp_path("corrupt.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_mute_silences_everything() {
        let mut settings = Settings::default();
        assert!(settings.effective_sfx_volume() > 0.0);
        settings.muted = true;
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        assert_eq!(settings.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_relative_saves_go_to_saves_dir() {
        let settings = Settings::default();
        assert_eq!(
            settings.save_file(Path::new("slot1.txt")),
            PathBuf::from("saves").join("slot1.txt")
        );
        let absolute = std::env::temp_dir().join("slot2.txt");
        assert_eq!(settings.save_file(&absolute), absolute);
    }

    #[test]
    fn test_out_of_range_volumes_are_clamped() {
        let settings = Settings {
            master_volume: 3.0,
            music_volume: -1.0,
            sfx_volume: 0.5,
            ..Default::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 0.5);
        assert_eq!(settings.effective_music_volume(), 0.0);
    }
}
