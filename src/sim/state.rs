//! Game state and session bookkeeping
//!
//! Everything one play session owns: the RNG, the player, the current room
//! or exploration enemies, running totals and the event queue the session
//! drains after each tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::ArenaConfig;
use super::difficulty::Difficulty;
use super::enemy::Enemy;
use super::player::Player;
use super::room::HazardField;
use crate::consts::*;
use crate::menu::Menu;

/// Top-level mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu pages are showing; any session is suspended
    Menu,
    /// Room-by-room hole dodging
    Playing,
    /// Free roaming with enemies
    Exploration,
}

/// Melee damage policy during a multi-tick attack window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitPolicy {
    /// Every attack-active tick damages every enemy in the zone
    PerTick,
    /// Each enemy takes at most one hit per swing
    #[default]
    OncePerSwing,
}

/// Things that happened during a tick, consumed by services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    Landed,
    AttackStarted,
    FellInHole { lives_left: u32 },
    /// `total_score` includes this level's `score`
    LevelCleared { level: u32, score: i32, total_score: i32 },
    LevelStarted { level: u32 },
    GameOver { total_score: i32 },
    EnemyHit { id: u32 },
    EnemyDefeated { id: u32 },
    MenuMoved,
    MenuConfirmed,
    NewGame { difficulty: Difficulty },
    ExplorationStarted,
    QuitRequested,
}

/// Running totals for one play session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub current_level: u32,
    pub total_score: i32,
    pub total_time: f32,
    pub player_lives: u32,
    pub game_over: bool,
    /// A play mode is on screen (cleared while the menu is up)
    pub game_started: bool,
    /// The active or suspended mode is a room run, not exploration
    pub in_room: bool,
}

impl Default for SessionProgress {
    fn default() -> Self {
        Self {
            current_level: 1,
            total_score: 0,
            total_time: 0.0,
            player_lives: STARTING_LIVES,
            game_over: false,
            game_started: false,
            in_room: false,
        }
    }
}

/// Fractional arena positions of the exploration enemies
const EXPLORATION_SPAWNS: [(f32, f32); 4] = [
    (0.25, 0.25),
    (0.75, 1.0 / 3.0),
    (0.5, 2.0 / 3.0),
    (0.1875, 0.75),
];

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub arena: ArenaConfig,
    pub phase: GamePhase,
    pub menu: Menu,
    pub progress: SessionProgress,
    pub difficulty: Difficulty,
    pub player: Player,
    /// Current room (room mode) or the hole layout enemies avoid (exploration)
    pub room: Option<HazardField>,
    /// Live exploration enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    pub hit_policy: HitPolicy,
    /// Latched once the player leaves the start zone; cleared on level advance only
    pub level_started: bool,
    /// Enemies already damaged by the current swing
    pub swing_hits: Vec<u32>,
    /// Mode Escape suspended, restored by Continue
    pub resume_phase: Option<GamePhase>,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    pub quit_requested: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default configuration
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, ArenaConfig::default(), Difficulty::default(), HitPolicy::default())
    }

    pub fn with_config(
        seed: u64,
        arena: ArenaConfig,
        default_difficulty: Difficulty,
        hit_policy: HitPolicy,
    ) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena,
            phase: GamePhase::Menu,
            menu: Menu::new(default_difficulty),
            progress: SessionProgress::default(),
            difficulty: default_difficulty,
            player: Player::spawn(arena),
            room: None,
            enemies: Vec::new(),
            hit_policy,
            level_started: false,
            swing_hits: Vec::new(),
            resume_phase: None,
            events: Vec::new(),
            quit_requested: false,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reset totals and build level 1 at `difficulty`
    pub fn start_new_game(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.progress = SessionProgress {
            game_started: true,
            in_room: true,
            ..SessionProgress::default()
        };
        self.enemies.clear();
        self.swing_hits.clear();
        self.resume_phase = None;
        self.phase = GamePhase::Playing;

        log::info!("New game on {}", difficulty.as_str());
        self.events.push(GameEvent::NewGame { difficulty });
        self.enter_level(1, STARTING_LIVES);
    }

    /// Fold the cleared room into the totals and build the next one
    pub fn advance_level(&mut self) {
        let Some(room) = self.room.as_ref() else {
            return;
        };
        let score = room.score();
        let lives = room.lives;
        self.progress.total_score += score;
        self.progress.total_time += room.elapsed_time;

        let next = self.progress.current_level + 1;
        log::info!(
            "Level {} cleared: +{} (total {}, {:.2}s)",
            self.progress.current_level,
            score,
            self.progress.total_score,
            self.progress.total_time
        );
        self.enter_level(next, lives);
    }

    fn enter_level(&mut self, level: u32, lives: u32) {
        self.progress.current_level = level;
        self.progress.player_lives = lives;
        self.level_started = false;
        self.respawn_player();
        self.room = Some(HazardField::new(
            self.arena,
            level,
            self.difficulty,
            lives,
            &mut self.rng,
        ));
        self.events.push(GameEvent::LevelStarted { level });
    }

    /// Replace the player with a fresh one at the spawn point
    pub fn respawn_player(&mut self) {
        self.player = Player::spawn(self.arena);
    }

    /// Legacy free-roam mode: four enemies over a level-1 hole layout.
    ///
    /// Any suspended room session is discarded.
    pub fn start_exploration(&mut self) {
        self.progress = SessionProgress::default();
        self.swing_hits.clear();
        self.resume_phase = None;
        self.level_started = false;
        self.respawn_player();
        self.room = Some(HazardField::new(
            self.arena,
            1,
            self.difficulty,
            STARTING_LIVES,
            &mut self.rng,
        ));

        self.enemies.clear();
        let (w, h) = (self.arena.width as f32, self.arena.height as f32);
        for (fx, fy) in EXPLORATION_SPAWNS {
            let id = self.next_entity_id();
            let enemy = Enemy::new(id, Vec2::new(fx * w, fy * h), self.arena, &mut self.rng);
            self.enemies.push(enemy);
        }

        self.phase = GamePhase::Exploration;
        self.progress.game_started = true;
        log::info!("Exploration started with {} enemies", self.enemies.len());
        self.events.push(GameEvent::ExplorationStarted);
    }

    /// Suspend the current mode and show the menu
    pub fn open_menu(&mut self) {
        if self.phase != GamePhase::Menu {
            self.resume_phase = Some(self.phase);
        }
        self.phase = GamePhase::Menu;
        self.progress.game_started = false;
        self.menu.reset();
    }

    /// Whether Continue has anything to resume
    pub fn can_continue(&self) -> bool {
        self.resume_phase.is_some()
    }

    /// Resume the suspended mode. Returns false if there is none.
    pub fn continue_game(&mut self) -> bool {
        match self.resume_phase.take() {
            Some(phase) => {
                self.phase = phase;
                self.progress.game_started = true;
                log::debug!("Resuming {phase:?}");
                true
            }
            None => false,
        }
    }

    /// Keep the ordering stable for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
    }
}
