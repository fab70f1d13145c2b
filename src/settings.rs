//! Player audio preferences
//!
//! Persisted separately from progress, as JSON in the local store.

use serde::{Deserialize, Serialize};

use crate::persistence::{LocalStore, keys};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Catch / failure effect volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Special-catch fanfare volume before boosting (0.0 - 1.0)
    pub fanfare_volume: f32,
    /// Gain multiplier applied on top of the fanfare volume
    pub fanfare_boost: f32,
    /// Silence everything
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 0.7,
            sfx_volume: 1.0,
            fanfare_volume: 1.0,
            fanfare_boost: 20.0,
            muted: false,
        }
    }
}

impl Settings {
    fn effective(&self, volume: f32) -> f32 {
        if self.muted { 0.0 } else { volume.clamp(0.0, 1.0) }
    }

    pub fn effective_music_volume(&self) -> f32 {
        self.effective(self.music_volume)
    }

    pub fn effective_sfx_volume(&self) -> f32 {
        self.effective(self.sfx_volume)
    }

    pub fn effective_fanfare_volume(&self) -> f32 {
        self.effective(self.fanfare_volume)
    }

    /// Load settings, falling back to defaults when absent or unreadable
    pub fn load(store: &dyn LocalStore) -> Self {
        if let Some(json) = store.get(keys::SETTINGS) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from local storage");
                    return settings;
                }
                Err(e) => log::warn!("Discarding unreadable settings: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings; failures are logged only
    pub fn save(&self, store: &mut dyn LocalStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(keys::SETTINGS, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::error!("Failed to save settings: {e}"),
            },
            Err(e) => log::error!("Failed to encode settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_roundtrip_through_store() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            music_volume: 0.2,
            muted: true,
            ..Default::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_corrupt_settings_use_defaults() {
        let mut store = MemoryStore::new();
        store.set(keys::SETTINGS, "{not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_mute_zeroes_everything() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_music_volume(), 0.0);
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        assert_eq!(settings.effective_fanfare_volume(), 0.0);
    }

    #[test]
    fn test_volumes_clamped() {
        let settings = Settings {
            sfx_volume: 3.0,
            ..Default::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 1.0);
    }
}
