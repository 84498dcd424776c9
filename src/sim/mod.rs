//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, owned by `GameState`
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod arena;
pub mod collision;
pub mod difficulty;
pub mod enemy;
pub mod player;
pub mod room;
pub mod state;
pub mod tick;

pub use arena::ArenaConfig;
pub use collision::{MeleeResult, is_path_safe, knockback_velocity, melee_hit};
pub use difficulty::Difficulty;
pub use enemy::{Enemy, EnemyState};
pub use player::{AttackState, Direction, HeldKeys, Player, Stance};
pub use room::{HazardField, Hole, Particle, RoomPhase, RoomTimer};
pub use state::{GameEvent, GamePhase, GameState, HitPolicy, SessionProgress};
pub use tick::{Key, TickInput, autopilot, tick};
