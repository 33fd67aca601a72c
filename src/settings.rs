//! Game settings and preferences
//!
//! Persisted separately from save slots, as `settings.json` under the storage root.

use serde::{Deserialize, Serialize};

use crate::consts::{FADE_IN_STEP, FADE_OUT_STEP};
use crate::persistence::Storage;

/// Volume change per options-menu press
pub const VOLUME_STEP: f32 = 0.1;

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
    /// Silence everything without touching the volume levels
    pub muted: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (shorter screen fades)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            // HUD
            show_fps: false,

            // Accessibility
            reduced_motion: false,
        }
    }
}

impl Settings {
    const FILE_NAME: &'static str = "settings.json";

    /// Effective sound effect volume (respects mute)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective music volume (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Per-frame fade-in alpha step (doubled under reduced motion)
    pub fn fade_in_step(&self) -> f32 {
        if self.reduced_motion {
            FADE_IN_STEP * 2.0
        } else {
            FADE_IN_STEP
        }
    }

    /// Per-frame fade-out alpha step (doubled under reduced motion)
    pub fn fade_out_step(&self) -> f32 {
        if self.reduced_motion {
            FADE_OUT_STEP * 2.0
        } else {
            FADE_OUT_STEP
        }
    }

    /// Clamp every volume into [0, 1] (hand-edited files can hold anything)
    pub fn sanitize(&mut self) {
        for v in [&mut self.master_volume, &mut self.sfx_volume, &mut self.music_volume] {
            *v = if v.is_finite() { (*v).clamp(0.0, 1.0) } else { 0.0 };
        }
    }

    /// Load settings from storage, writing defaults if missing or corrupt
    pub fn load(storage: &Storage) -> Self {
        let mut settings: Settings = storage.load_or_default(Self::FILE_NAME);
        settings.sanitize();
        log::info!("Loaded settings from {}", storage.path(Self::FILE_NAME).display());
        settings
    }

    /// Save settings to storage
    pub fn save(&self, storage: &Storage) {
        match storage.write(Self::FILE_NAME, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(err) => log::warn!("Settings not saved: {}", err),
        }
    }
}

/// Step a volume by `delta`, staying within [0, 1]
pub fn step_volume(volume: f32, delta: f32) -> f32 {
    // Round to the step grid so repeated presses land on exact tenths
    ((volume + delta) / VOLUME_STEP).round().clamp(0.0, 1.0 / VOLUME_STEP) * VOLUME_STEP
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mute_silences_everything() {
        let mut settings = Settings::default();
        assert!(settings.effective_sfx_volume() > 0.0);
        settings.muted = true;
        assert_eq!(settings.effective_sfx_volume(), 0.0);
        assert_eq!(settings.effective_music_volume(), 0.0);
    }

    #[test]
    fn test_reduced_motion_doubles_fade_steps() {
        let mut settings = Settings::default();
        let (fade_in, fade_out) = (settings.fade_in_step(), settings.fade_out_step());
        settings.reduced_motion = true;
        assert_eq!(settings.fade_in_step(), fade_in * 2.0);
        assert_eq!(settings.fade_out_step(), fade_out * 2.0);
    }

    #[test]
    fn test_step_volume_clamps() {
        assert!((step_volume(0.95, VOLUME_STEP) - 1.0).abs() < 1e-6);
        assert_eq!(step_volume(0.0, -VOLUME_STEP), 0.0);
        assert!((step_volume(0.5, -VOLUME_STEP) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        let mut settings = Settings::load(&storage);
        assert_eq!(settings, Settings::default());

        settings.show_fps = true;
        settings.music_volume = 0.3;
        settings.save(&storage);
        assert_eq!(Settings::load(&storage), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults_and_clamps() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        std::fs::write(storage.path("settings.json"), r#"{"master_volume": 3.0, "muted": true}"#)
            .unwrap();
        let settings = Settings::load(&storage);
        assert_eq!(settings.master_volume, 1.0);
        assert!(settings.muted);
        assert_eq!(settings.sfx_volume, Settings::default().sfx_volume);
    }
}
