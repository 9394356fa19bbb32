use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::BinauralApp;

/// Returns the path to the settings file: `~/.config/binaural-pad/settings.json`
fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("binaural-pad");
    path.push("settings.json");
    path
}

/// Persisted application settings.
///
/// Serialized as JSON to the platform config directory.
/// Fields use `#[serde(default)]` so that adding new settings
/// won't break existing config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    // Playback
    pub volume: f32,

    // File dialog
    pub last_directory: Option<PathBuf>,

    // Pad
    pub show_guides: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            last_directory: None,
            show_guides: false,
        }
    }
}

impl AppSettings {
    /// Load settings from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse settings ({}), using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("No settings file found ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk as pretty JSON.
    pub fn save(&self) {
        self.save_to(&settings_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Failed to create config directory: {}", e);
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Failed to write settings: {}", e);
                }
            }
            Err(e) => {
                log::warn!("Failed to serialize settings: {}", e);
            }
        }
    }

    /// Extract current settings from the running application.
    pub fn from_app(app: &BinauralApp) -> Self {
        Self {
            volume: app.player.volume,
            last_directory: app.last_directory.clone(),
            show_guides: app.pad.settings.show_guides,
        }
    }

    /// Apply loaded settings to the running application.
    pub fn apply(&self, app: &mut BinauralApp) {
        app.player.volume = self.volume.clamp(0.0, 2.0);
        app.player.sync_volume();
        app.last_directory = self.last_directory.clone();
        app.pad.settings.show_guides = self.show_guides;
    }
}
