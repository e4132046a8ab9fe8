//! Game settings and preferences
//!
//! Persisted in LocalStorage. Scores are never stored.

use serde::{Deserialize, Serialize};

use crate::consts::GAMEPAD_DEADZONE;
use crate::sim::ScoringMode;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Point per contact frame, or one per contact
    pub scoring: ScoringMode,

    // === Gamepad ===
    /// Stick magnitude that must be exceeded to move
    pub gamepad_deadzone: f32,
    /// Flip the vertical stick axis
    pub invert_gamepad_y: bool,

    /// Directory the image assets are served from
    pub asset_base: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scoring: ScoringMode::EveryFrame,
            gamepad_deadzone: GAMEPAD_DEADZONE,
            invert_gamepad_y: false,
            asset_base: "assets".to_string(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "saber_duel_settings";

    /// Parse stored JSON, falling back to defaults on garbage
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Settings saved"),
                    Err(e) => log::warn!("Could not store settings: {:?}", e),
                },
                Err(e) => log::warn!("Could not serialize settings: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_preserve_every_frame_scoring() {
        let settings = Settings::default();
        assert_eq!(settings.scoring, ScoringMode::EveryFrame);
        assert_eq!(settings.gamepad_deadzone, 0.5);
        assert_eq!(settings.asset_base, "assets");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"scoring":"OncePerContact"}"#);
        assert_eq!(settings.scoring, ScoringMode::OncePerContact);
        assert_eq!(settings.gamepad_deadzone, 0.5);
        assert!(!settings.invert_gamepad_y);
    }

    #[test]
    fn test_garbage_json_uses_defaults() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            invert_gamepad_y: true,
            gamepad_deadzone: 0.25,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json), settings);
    }
}
