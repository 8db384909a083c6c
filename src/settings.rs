//! Player settings
//!
//! Rendering toggles the core only stores (the renderer reads them) plus the
//! flight-mode switch that selects the craft variant for the next session.
//! Persisted as JSON next to the ranking file.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One toggle shown in the settings menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Setting {
    Wireframe,
    EnvMap,
    Headlight,
    Shadow,
    Blending,
    FlightMode,
}

impl Setting {
    /// Menu order
    pub const ALL: [Setting; 6] = [
        Setting::Wireframe,
        Setting::EnvMap,
        Setting::Headlight,
        Setting::Shadow,
        Setting::Blending,
        Setting::FlightMode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Setting::Wireframe => "Wireframe",
            Setting::EnvMap => "Environment mapping",
            Setting::Headlight => "Headlight",
            Setting::Shadow => "Shadow",
            Setting::Blending => "Blending",
            Setting::FlightMode => "Flight mode",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Rendering ===
    pub wireframe: bool,
    pub envmap: bool,
    pub headlight: bool,
    pub shadow: bool,
    pub blending: bool,

    // === Gameplay ===
    /// Fly a free-flight craft through a 3D course (takes effect on restart)
    pub flight_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wireframe: false,
            envmap: true,
            headlight: false,
            shadow: true,
            blending: true,
            flight_mode: false,
        }
    }
}

impl Settings {
    pub fn get(&self, setting: Setting) -> bool {
        match setting {
            Setting::Wireframe => self.wireframe,
            Setting::EnvMap => self.envmap,
            Setting::Headlight => self.headlight,
            Setting::Shadow => self.shadow,
            Setting::Blending => self.blending,
            Setting::FlightMode => self.flight_mode,
        }
    }

    pub fn set(&mut self, setting: Setting, on: bool) {
        let slot = match setting {
            Setting::Wireframe => &mut self.wireframe,
            Setting::EnvMap => &mut self.envmap,
            Setting::Headlight => &mut self.headlight,
            Setting::Shadow => &mut self.shadow,
            Setting::Blending => &mut self.blending,
            Setting::FlightMode => &mut self.flight_mode,
        };
        *slot = on;
    }

    pub fn toggle(&mut self, setting: Setting) -> bool {
        let on = !self.get(setting);
        self.set(setting, on);
        log::info!("{} {}", setting.as_str(), if on { "on" } else { "off" });
        on
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read settings {}: {}, using defaults", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Malformed settings {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_every_setting() {
        let mut settings = Settings::default();
        for setting in Setting::ALL {
            settings.set(setting, true);
            assert!(settings.get(setting));
            settings.set(setting, false);
            assert!(!settings.get(setting));
        }
    }

    #[test]
    fn test_toggle() {
        let mut settings = Settings::default();
        assert!(settings.toggle(Setting::Wireframe));
        assert!(settings.wireframe);
        assert!(!settings.toggle(Setting::Wireframe));
    }

    #[test]
    fn test_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::default();
        settings.flight_mode = true;
        settings.shadow = false;
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"flight_mode": true}"#).unwrap();
        let settings = Settings::load(&path);
        assert!(settings.flight_mode);
        assert_eq!(settings.envmap, Settings::default().envmap);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(dir.path().join("none.json")), Settings::default());
    }
}
