//! Audio service
//!
//! Keeps a registry of sound/music assets and gates playback: an asset that
//! failed to load is simply absent and playing it is a no-op. The device
//! itself sits behind [`AudioOutput`] so hosts can plug in a real mixer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player dropped into a hole
    HoleFall,
    /// End zone reached
    LevelComplete,
    /// Menu cursor or confirm
    MenuSelect,
    Jump,
    Land,
    Attack,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 6] = [
        SoundEffect::HoleFall,
        SoundEffect::LevelComplete,
        SoundEffect::MenuSelect,
        SoundEffect::Jump,
        SoundEffect::Land,
        SoundEffect::Attack,
    ];

    /// File name under the asset directory
    pub fn file_name(self) -> &'static str {
        match self {
            SoundEffect::HoleFall => "hole_fall.wav",
            SoundEffect::LevelComplete => "level_complete.wav",
            SoundEffect::MenuSelect => "menu_select.wav",
            SoundEffect::Jump => "jump.wav",
            SoundEffect::Land => "land.wav",
            SoundEffect::Attack => "attack.wav",
        }
    }
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicTrack {
    Menu,
    Gameplay,
    GameOver,
}

impl MusicTrack {
    pub const ALL: [MusicTrack; 3] = [MusicTrack::Menu, MusicTrack::Gameplay, MusicTrack::GameOver];

    pub fn file_name(self) -> &'static str {
        match self {
            MusicTrack::Menu => "menu.ogg",
            MusicTrack::Gameplay => "gameplay.ogg",
            MusicTrack::GameOver => "game_over.ogg",
        }
    }
}

/// Playback device
pub trait AudioOutput {
    fn play_sound(&mut self, asset: &Path, volume: f32);
    fn play_music(&mut self, asset: &Path, volume: f32, looped: bool);
    fn stop_music(&mut self);
}

/// Output that only logs, for headless runs
#[derive(Debug, Default)]
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn play_sound(&mut self, asset: &Path, volume: f32) {
        log::trace!("sound {} @ {volume:.2}", asset.display());
    }

    fn play_music(&mut self, asset: &Path, volume: f32, looped: bool) {
        log::trace!("music {} @ {volume:.2} (loop: {looped})", asset.display());
    }

    fn stop_music(&mut self) {
        log::trace!("music stopped");
    }
}

/// Audio manager for the game
pub struct AudioManager {
    output: Box<dyn AudioOutput>,
    sounds: HashMap<SoundEffect, PathBuf>,
    music: HashMap<MusicTrack, PathBuf>,
    current_track: Option<MusicTrack>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(SilentOutput))
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("sounds", &self.sounds.len())
            .field("music", &self.music.len())
            .field("current_track", &self.current_track)
            .field("muted", &self.muted)
            .finish()
    }
}

impl AudioManager {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            output,
            sounds: HashMap::new(),
            music: HashMap::new(),
            current_track: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    /// Register a sound file. Missing files are logged and left absent.
    pub fn load_sound(&mut self, effect: SoundEffect, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        if !path.is_file() {
            log::warn!("Sound {:?} not found at {}", effect, path.display());
            self.sounds.remove(&effect);
            return false;
        }
        self.sounds.insert(effect, path.to_path_buf());
        true
    }

    /// Register a music file. Missing files are logged and left absent.
    pub fn load_music(&mut self, track: MusicTrack, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        if !path.is_file() {
            log::warn!("Music {:?} not found at {}", track, path.display());
            self.music.remove(&track);
            return false;
        }
        self.music.insert(track, path.to_path_buf());
        true
    }

    /// Try every known asset under `dir`. Returns how many loaded.
    pub fn load_assets(&mut self, dir: impl AsRef<Path>) -> usize {
        let dir = dir.as_ref();
        let sounds = SoundEffect::ALL
            .into_iter()
            .filter(|&e| self.load_sound(e, dir.join(e.file_name())))
            .count();
        let tracks = MusicTrack::ALL
            .into_iter()
            .filter(|&t| self.load_music(t, dir.join(t.file_name())))
            .count();
        log::info!(
            "Audio assets from {}: {sounds}/{} sounds, {tracks}/{} tracks",
            dir.display(),
            SoundEffect::ALL.len(),
            MusicTrack::ALL.len()
        );
        sounds + tracks
    }

    pub fn has_sound(&self, effect: SoundEffect) -> bool {
        self.sounds.contains_key(&effect)
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.stop_music();
        }
    }

    fn sfx_level(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume * self.sfx_volume }
    }

    fn music_level(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume * self.music_volume }
    }

    /// Play a sound effect. Returns false if nothing was played.
    pub fn play(&mut self, effect: SoundEffect) -> bool {
        let vol = self.sfx_level();
        if vol <= 0.0 {
            return false;
        }
        let Some(path) = self.sounds.get(&effect) else {
            return false;
        };
        self.output.play_sound(path, vol);
        true
    }

    /// Switch to `track` (looping). Already playing is a no-op success.
    pub fn play_music(&mut self, track: MusicTrack) -> bool {
        if self.current_track == Some(track) {
            return true;
        }
        let vol = self.music_level();
        if vol <= 0.0 {
            return false;
        }
        let Some(path) = self.music.get(&track) else {
            return false;
        };
        self.output.play_music(path, vol, track != MusicTrack::GameOver);
        self.current_track = Some(track);
        true
    }

    pub fn stop_music(&mut self) {
        if self.current_track.take().is_some() {
            self.output.stop_music();
        }
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current_track
    }
}
