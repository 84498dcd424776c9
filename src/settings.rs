//! Game settings and preferences
//!
//! Loaded from a JSON file next to the executable. Every field has a default,
//! so partial files are fine and a missing file means "all defaults".

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::highscores::DEFAULT_SCORE_FILE;
use crate::sim::{ArenaConfig, Difficulty, HitPolicy};

/// Default settings file, relative to the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "amazing_ball.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Playfield geometry
    pub arena: ArenaConfig,
    /// Difficulty highlighted when the difficulty page opens
    pub default_difficulty: Difficulty,
    /// Fixed RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Damage rule for multi-tick attack windows
    pub melee_hit_policy: HitPolicy,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
    /// Directory holding sound and music files
    pub asset_dir: PathBuf,

    /// Best-score file
    pub score_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            default_difficulty: Difficulty::Medium,
            seed: None,
            melee_hit_policy: HitPolicy::OncePerSwing,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            asset_dir: PathBuf::from("assets"),

            score_file: PathBuf::from(DEFAULT_SCORE_FILE),
        }
    }
}

impl Settings {
    /// Parse settings from JSON text
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from `path`, falling back to defaults.
    ///
    /// A missing file is silent; an unreadable or malformed one is logged.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Failed to read {}: {e}", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to `path`. Returns false (and logs) on failure.
    pub fn save(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let result = self
            .to_json()
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(path, json));
        match result {
            Ok(()) => {
                log::info!("Settings saved to {}", path.display());
                true
            }
            Err(e) => {
                log::warn!("Failed to save settings to {}: {e}", path.display());
                false
            }
        }
    }

    /// Clamp volumes into range
    pub fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self
    }

    /// Configured seed, or a fresh random one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
