//! Session controller
//!
//! Owns the simulation state plus the services it talks to. The simulation
//! only emits [`GameEvent`]s; this is where they become sounds, music
//! changes and score writes.

use crate::audio::{AudioManager, MusicTrack, SoundEffect};
use crate::highscores::{HighScores, ScoreStore};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// A running game with its services
pub struct Session {
    pub state: GameState,
    scores: Box<dyn ScoreStore>,
    audio: AudioManager,
    last_phase: GamePhase,
}

impl Session {
    /// Build a session from settings, with services supplied by the host
    pub fn new(settings: &Settings, mut scores: Box<dyn ScoreStore>, mut audio: AudioManager) -> Self {
        let seed = settings.resolve_seed();
        log::info!("Session seed {seed}");

        let state = GameState::with_config(
            seed,
            settings.arena,
            settings.default_difficulty,
            settings.melee_hit_policy,
        );

        scores.load();

        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        audio.play_music(MusicTrack::Menu);

        Self {
            last_phase: state.phase,
            state,
            scores,
            audio,
        }
    }

    /// Advance one fixed step and dispatch what happened
    pub fn update(&mut self, input: &TickInput, dt: f32) {
        tick(&mut self.state, input, dt);

        for event in self.state.drain_events() {
            self.handle_event(event);
        }

        if self.state.phase != self.last_phase {
            let progress = &self.state.progress;
            let track = if !progress.game_started {
                MusicTrack::Menu
            } else if progress.in_room && progress.game_over {
                MusicTrack::GameOver
            } else {
                MusicTrack::Gameplay
            };
            self.audio.play_music(track);
            self.last_phase = self.state.phase;
        }
    }

    fn handle_event(&mut self, event: GameEvent) {
        log::debug!("{event:?}");
        match event {
            GameEvent::Jumped => {
                self.audio.play(SoundEffect::Jump);
            }
            GameEvent::Landed => {
                self.audio.play(SoundEffect::Land);
            }
            GameEvent::AttackStarted => {
                self.audio.play(SoundEffect::Attack);
            }
            GameEvent::FellInHole { .. } => {
                self.audio.play(SoundEffect::HoleFall);
            }
            GameEvent::LevelCleared { total_score, .. } => {
                self.audio.play(SoundEffect::LevelComplete);
                self.record_score(total_score);
            }
            GameEvent::GameOver { total_score } => {
                self.audio.play(SoundEffect::HoleFall);
                self.audio.play_music(MusicTrack::GameOver);
                self.record_score(total_score);
            }
            GameEvent::MenuMoved | GameEvent::MenuConfirmed => {
                self.audio.play(SoundEffect::MenuSelect);
            }
            GameEvent::NewGame { .. } | GameEvent::ExplorationStarted => {
                self.audio.play_music(MusicTrack::Gameplay);
            }
            GameEvent::EnemyHit { .. } | GameEvent::EnemyDefeated { .. } => {
                self.audio.play(SoundEffect::Attack);
            }
            GameEvent::LevelStarted { .. } | GameEvent::QuitRequested => {}
        }
    }

    fn record_score(&mut self, score: i32) {
        let difficulty = self.state.difficulty;
        if self.scores.save(score, difficulty) {
            log::info!("New best on {}: {score}", difficulty.as_str());
        }
    }

    pub fn high_scores(&self) -> HighScores {
        self.scores.scores()
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    pub fn should_quit(&self) -> bool {
        self.state.quit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryScoreStore;
    use crate::audio::MusicTrack;
    use crate::sim::{Difficulty, HeldKeys, Hole, Key};
    use glam::Vec2;

    fn session(seed: u64) -> Session {
        let settings = Settings {
            seed: Some(seed),
            ..Default::default()
        };
        Session::new(&settings, Box::new(MemoryScoreStore::default()), AudioManager::default())
    }

    fn session_with_music(seed: u64, name: &str) -> (Session, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("amazing-ball-session-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for track in MusicTrack::ALL {
            std::fs::write(dir.join(track.file_name()), b"OggS").unwrap();
        }
        let mut audio = AudioManager::default();
        audio.load_assets(&dir);
        let settings = Settings {
            seed: Some(seed),
            ..Default::default()
        };
        let s = Session::new(&settings, Box::new(MemoryScoreStore::default()), audio);
        (s, dir)
    }

    fn fall_to_game_over(s: &mut Session) {
        {
            let room = s.state.room.as_mut().unwrap();
            room.holes = vec![Hole {
                position: Vec2::new(83.5, 300.0),
                radius: 16,
            }];
            room.electric_star = None;
            room.satellite_star = None;
        }
        for _ in 0..3 {
            s.update(&right(), crate::consts::SIM_DT);
        }
    }

    fn clear_holes(session: &mut Session) {
        if let Some(room) = session.state.room.as_mut() {
            room.holes.clear();
            room.electric_star = None;
            room.satellite_star = None;
        }
    }

    fn right() -> TickInput {
        TickInput::hold(HeldKeys {
            right: true,
            ..Default::default()
        })
    }

    #[test]
    fn test_seed_from_settings() {
        let s = session(77);
        assert_eq!(s.state.seed, 77);
        assert_eq!(s.state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_level_clear_saves_running_total() {
        let mut s = session(1);
        s.state.start_new_game(Difficulty::Easy);
        clear_holes(&mut s);

        for _ in 0..200 {
            s.update(&right(), crate::consts::SIM_DT);
        }
        assert!(s.state.room.as_ref().unwrap().is_celebrating());
        let best = s.high_scores().easy;
        assert!(best > 900);
        assert_eq!(s.high_scores().medium, 0);
        assert!(s.state.events.is_empty());
    }

    #[test]
    fn test_game_over_saves_only_improvements() {
        let mut s = session(2);
        s.state.start_new_game(Difficulty::Hard);
        s.state.progress.total_score = 1500;
        {
            let room = s.state.room.as_mut().unwrap();
            room.holes = vec![Hole {
                position: Vec2::new(83.5, 300.0),
                radius: 16,
            }];
            room.electric_star = None;
        }
        for _ in 0..3 {
            s.update(&right(), crate::consts::SIM_DT);
        }
        assert!(s.state.progress.game_over);
        assert_eq!(s.high_scores().hard, 1500);
    }

    #[test]
    fn test_continue_into_finished_room_plays_game_over_music() {
        let (mut s, dir) = session_with_music(4, "continue");
        assert_eq!(s.audio().current_track(), Some(MusicTrack::Menu));

        s.state.start_new_game(Difficulty::Easy);
        fall_to_game_over(&mut s);
        assert!(s.state.progress.game_over);
        assert_eq!(s.audio().current_track(), Some(MusicTrack::GameOver));

        s.update(&TickInput::press(Key::Escape), crate::consts::SIM_DT);
        assert_eq!(s.audio().current_track(), Some(MusicTrack::Menu));

        s.update(&TickInput::press(Key::Down), crate::consts::SIM_DT);
        s.update(&TickInput::press(Key::Confirm), crate::consts::SIM_DT);
        assert_eq!(s.state.phase, GamePhase::Playing);
        assert_eq!(s.audio().current_track(), Some(MusicTrack::GameOver));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_quit_flag() {
        let mut s = session(3);
        for _ in 0..4 {
            s.update(&TickInput::press(Key::Down), crate::consts::SIM_DT);
        }
        s.update(&TickInput::press(Key::Confirm), crate::consts::SIM_DT);
        assert!(s.should_quit());
    }
}
