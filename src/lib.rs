//! Amazing Ball - A 2D hole-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rooms, actors, collisions, session state)
//! - `menu`: Menu navigation state machine
//! - `session`: Session controller wiring the simulation to its services
//! - `highscores`: Best score per difficulty, persisted to a text file
//! - `audio`: Sound/music asset registry and playback gate
//! - `renderer`: Draw-primitive scene walk (backend supplied by the host)
//! - `settings`: Data-driven configuration

pub mod audio;
pub mod highscores;
pub mod menu;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{FileScoreStore, HighScores, MemoryScoreStore, ScoreStore};
pub use session::Session;
pub use settings::Settings;

/// 2D float vector used throughout the simulation.
///
/// `glam::Vec2` already provides `+`, `-`, scalar `*`, `+=` and `ZERO`.
pub type Vector2D = glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one update per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Arena defaults (overridable through `ArenaConfig`)
    pub const ARENA_WIDTH: i32 = 800;
    pub const ARENA_HEIGHT: i32 = 600;
    pub const ARENA_MARGIN: i32 = 40;
    pub const START_ZONE_WIDTH: i32 = 100;
    pub const END_ZONE_WIDTH: i32 = 100;
    pub const SPAWN_X: f32 = 80.0;
    pub const HOLE_INSET_X: i32 = 150;
    pub const HOLE_INSET_Y: i32 = 100;

    /// Player defaults (per-tick units)
    pub const PLAYER_RADIUS: i32 = 8;
    pub const PLAYER_SPEED: f32 = 3.5;
    pub const PLAYER_JUMP_VELOCITY: f32 = -7.5;
    pub const PLAYER_GRAVITY: f32 = 0.6;
    pub const ATTACK_DURATION_TICKS: u32 = 15;
    pub const ATTACK_RANGE: f32 = 30.0;
    /// Perpendicular tolerance of the melee hit band
    pub const ATTACK_BAND: f32 = 15.0;
    pub const SATELLITE_DELAY_FRAMES: usize = 15;

    /// Enemy defaults
    pub const ENEMY_RADIUS: i32 = 12;
    pub const ENEMY_SPEED: f32 = 1.5;
    pub const ENEMY_HEALTH: i32 = 2;
    pub const ENEMY_DETECTION_RADIUS: f32 = 200.0;
    pub const ENEMY_ATTACK_RADIUS: f32 = 30.0;
    pub const ENEMY_ATTACK_COOLDOWN: u32 = 60;
    pub const KNOCKBACK_DURATION_TICKS: u32 = 15;
    pub const KNOCKBACK_DECAY: f32 = 0.85;

    /// Room rules
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;
    pub const BASE_SCORE: i32 = 1000;
    pub const CELEBRATION_PARTICLES: usize = 50;
    pub const PARTICLE_GRAVITY: f32 = 200.0;
    /// Seconds of celebration before the next room is built
    pub const CELEBRATION_DELAY: f32 = 2.0;
    pub const STARTING_LIVES: u32 = 3;
}

/// Normalize angle to [0, 2π)
#[inline]
pub fn wrap_phase(mut phase: f32) -> f32 {
    use std::f32::consts::TAU;
    while phase >= TAU {
        phase -= TAU;
    }
    while phase < 0.0 {
        phase += TAU;
    }
    phase
}
