//! The player ball
//!
//! Movement is in per-tick units. Jumping is a vertical hop with gravity;
//! attacking opens a fixed-length melee window. A delayed copy of the
//! position trail drives the satellite companion.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::ArenaConfig;
use crate::consts::*;
use crate::wrap_phase;

/// Facing, recorded from the last movement key processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Down,
    Up,
    Left,
    Right,
}

/// Movement keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Vertical state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Stance {
    Grounded,
    Airborne { vertical_velocity: f32 },
}

/// Melee state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackState {
    Ready,
    Active { ticks_left: u32 },
}

/// Companion trailing the player through the position history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Satellite {
    /// Resting offset from the delayed anchor
    pub offset: Vec2,
    /// Spring lag opposing recent movement
    pub lag: Vec2,
    pub float_phase: f32,
    pub radius: i32,
    previous_anchor: Vec2,
}

const SATELLITE_LAG_FACTOR: f32 = 0.08;
const SATELLITE_MAX_LAG: f32 = 20.0;
const SATELLITE_FLOAT_SPEED: f32 = 0.05;
const SATELLITE_FLOAT_AMPLITUDE: f32 = 4.0;
const HALO_SPEED: f32 = 0.08;

impl Satellite {
    fn new(anchor: Vec2) -> Self {
        Self {
            offset: Vec2::new(25.0, -20.0),
            lag: Vec2::ZERO,
            float_phase: 0.0,
            radius: 6,
            previous_anchor: anchor,
        }
    }

    fn update(&mut self, anchor: Vec2) {
        let movement = anchor - self.previous_anchor;
        let target = (-movement * 5.0).clamp(
            Vec2::splat(-SATELLITE_MAX_LAG),
            Vec2::splat(SATELLITE_MAX_LAG),
        );
        self.lag += (target - self.lag) * SATELLITE_LAG_FACTOR;

        if movement.x.abs() < 0.1 && movement.y.abs() < 0.1 {
            self.lag *= 0.85;
        }

        self.previous_anchor = anchor;
        self.float_phase = wrap_phase(self.float_phase + SATELLITE_FLOAT_SPEED);
    }
}

/// The player-controlled ball
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    pub direction: Direction,
    pub radius: i32,
    pub speed: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    /// Row every hop lands on, fixed at construction
    pub ground_level: f32,
    pub satellite: Satellite,
    /// Halo pulse (render only)
    pub halo_phase: f32,
    stance: Stance,
    attack: AttackState,
    history: VecDeque<Vec2>,
    arena: ArenaConfig,
}

impl Player {
    /// Fresh player at `position`. The history starts full of that position.
    pub fn new(position: Vec2, arena: ArenaConfig) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            direction: Direction::Down,
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            jump_velocity: PLAYER_JUMP_VELOCITY,
            gravity: PLAYER_GRAVITY,
            ground_level: position.y,
            satellite: Satellite::new(position),
            halo_phase: 0.0,
            stance: Stance::Grounded,
            attack: AttackState::Ready,
            history: std::iter::repeat_n(position, SATELLITE_DELAY_FRAMES).collect(),
            arena,
        }
    }

    /// Fresh player at the arena's spawn point
    pub fn spawn(arena: ArenaConfig) -> Self {
        Self::new(arena.spawn_point(), arena)
    }

    /// Set velocity from held keys.
    ///
    /// Axes are independent and not normalized. Vertical keys are processed
    /// before horizontal ones, so the facing ends on the last one held.
    pub fn apply_movement(&mut self, held: HeldKeys) {
        self.velocity = Vec2::ZERO;

        if held.up {
            self.velocity.y = -self.speed;
            self.direction = Direction::Up;
        }
        if held.down {
            self.velocity.y = self.speed;
            self.direction = Direction::Down;
        }
        if held.left {
            self.velocity.x = -self.speed;
            self.direction = Direction::Left;
        }
        if held.right {
            self.velocity.x = self.speed;
            self.direction = Direction::Right;
        }
    }

    /// Start a hop. Only from the ground and never mid-attack.
    pub fn try_jump(&mut self) -> bool {
        if self.is_grounded() && !self.is_attacking() {
            self.stance = Stance::Airborne {
                vertical_velocity: self.jump_velocity,
            };
            true
        } else {
            false
        }
    }

    /// Open the melee window unless one is already open
    pub fn try_attack(&mut self) -> bool {
        if self.is_attacking() {
            return false;
        }
        self.attack = AttackState::Active {
            ticks_left: ATTACK_DURATION_TICKS,
        };
        true
    }

    /// Integrate one tick. Returns true if the player landed this tick.
    pub fn update(&mut self) -> bool {
        self.position += self.velocity;

        let mut landed = false;
        if let Stance::Airborne { vertical_velocity } = &mut self.stance {
            *vertical_velocity += self.gravity;
            self.position.y += *vertical_velocity;

            if self.position.y >= self.ground_level {
                self.position.y = self.ground_level;
                landed = true;
            }
        }
        if landed {
            self.stance = Stance::Grounded;
        }

        self.position.x = self.arena.clamp_x(self.position.x, self.radius);

        // Top wall only; the bottom is bounded by the ground
        let min_y = self.arena.min_y(self.radius);
        if self.position.y < min_y {
            self.position.y = min_y;
            if let Stance::Airborne { vertical_velocity } = &mut self.stance {
                *vertical_velocity = 0.0;
            }
        }

        self.history.push_back(self.position);
        if self.history.len() > SATELLITE_DELAY_FRAMES {
            self.history.pop_front();
        }
        let anchor = self.satellite_anchor();
        self.satellite.update(anchor);

        self.halo_phase = wrap_phase(self.halo_phase + HALO_SPEED);

        if let AttackState::Active { ticks_left } = &mut self.attack {
            *ticks_left = ticks_left.saturating_sub(1);
            if *ticks_left == 0 {
                self.attack = AttackState::Ready;
            }
        }

        landed
    }

    #[inline]
    pub fn stance(&self) -> Stance {
        self.stance
    }

    #[inline]
    pub fn attack_state(&self) -> AttackState {
        self.attack
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.stance == Stance::Grounded
    }

    #[inline]
    pub fn is_attacking(&self) -> bool {
        matches!(self.attack, AttackState::Active { .. })
    }

    /// Ticks left in the melee window (0 when ready)
    pub fn attack_ticks_left(&self) -> u32 {
        match self.attack {
            AttackState::Active { ticks_left } => ticks_left,
            AttackState::Ready => 0,
        }
    }

    #[inline]
    pub fn attack_range(&self) -> f32 {
        ATTACK_RANGE
    }

    /// Position from `SATELLITE_DELAY_FRAMES - 1` ticks ago
    pub fn satellite_anchor(&self) -> Vec2 {
        self.history.front().copied().unwrap_or(self.position)
    }

    /// Where the satellite is drawn this tick
    pub fn satellite_position(&self) -> Vec2 {
        let float = Vec2::new(
            0.0,
            SATELLITE_FLOAT_AMPLITUDE * self.satellite.float_phase.sin(),
        );
        self.satellite_anchor() + self.satellite.offset + self.satellite.lag + float
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(Vec2::new(400.0, 300.0), ArenaConfig::default())
    }

    fn held(up: bool, down: bool, left: bool, right: bool) -> HeldKeys {
        HeldKeys {
            up,
            down,
            left,
            right,
        }
    }

    #[test]
    fn test_diagonal_is_full_speed_per_axis() {
        let mut p = player();
        p.apply_movement(held(true, false, false, true));
        assert_eq!(p.velocity, Vec2::new(3.5, -3.5));
        p.update();
        assert_eq!(p.position, Vec2::new(403.5, 296.5));
    }

    #[test]
    fn test_direction_priority() {
        let mut p = player();
        p.apply_movement(held(true, true, true, true));
        assert_eq!(p.direction, Direction::Right);
        assert_eq!(p.velocity, Vec2::new(3.5, 3.5));

        p.apply_movement(held(true, false, true, false));
        assert_eq!(p.direction, Direction::Left);

        p.apply_movement(held(true, true, false, false));
        assert_eq!(p.direction, Direction::Down);

        // Releasing everything keeps the last facing
        p.apply_movement(HeldKeys::default());
        assert_eq!(p.direction, Direction::Down);
        assert_eq!(p.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_jump_arc_lands_on_spawn_row() {
        let mut p = player();
        assert!(p.try_jump());
        assert!(!p.try_jump());
        assert_eq!(p.ground_level, 300.0);

        p.update();
        assert!((p.position.y - 293.1).abs() < 1e-4);

        let mut ticks = 1;
        while !p.update() {
            ticks += 1;
            assert!(ticks < 100, "never landed");
            assert!(p.position.y <= 300.0);
        }
        assert_eq!(p.position.y, 300.0);
        assert!(p.is_grounded());
    }

    #[test]
    fn test_jump_from_above_spawn_row_drops_to_ground() {
        let mut p = player();
        p.apply_movement(held(true, false, false, false));
        for _ in 0..40 {
            p.update();
        }
        assert_eq!(p.position.y, 160.0);

        p.apply_movement(HeldKeys::default());
        assert!(p.try_jump());
        let mut ticks = 0;
        while !p.update() {
            ticks += 1;
            assert!(ticks < 200, "never landed");
        }
        assert_eq!(p.position.y, 300.0);
        assert!(p.is_grounded());
    }

    #[test]
    fn test_jump_from_below_spawn_row_snaps_up() {
        let mut p = player();
        p.apply_movement(held(false, true, false, false));
        for _ in 0..20 {
            p.update();
        }
        p.apply_movement(HeldKeys::default());
        assert!(p.try_jump());
        assert!(p.update());
        assert_eq!(p.position.y, 300.0);
    }

    #[test]
    fn test_no_jump_while_attacking() {
        let mut p = player();
        assert!(p.try_attack());
        assert!(!p.try_jump());
        assert!(p.is_grounded());
    }

    #[test]
    fn test_attack_window_length() {
        let mut p = player();
        assert!(p.try_attack());
        assert!(!p.try_attack());
        for _ in 0..ATTACK_DURATION_TICKS - 1 {
            p.update();
            assert!(p.is_attacking());
        }
        p.update();
        assert!(!p.is_attacking());
        assert!(p.try_attack());
    }

    #[test]
    fn test_screen_bounds() {
        let mut p = Player::new(Vec2::new(50.0, 50.0), ArenaConfig::default());
        p.apply_movement(held(true, false, true, false));
        p.update();
        assert_eq!(p.position, Vec2::new(48.0, 48.0));

        let mut p = Player::new(Vec2::new(750.0, 590.0), ArenaConfig::default());
        p.apply_movement(held(false, true, false, true));
        p.update();
        assert_eq!(p.position.x, 752.0);
        // No bottom clamp
        assert_eq!(p.position.y, 593.5);
    }

    #[test]
    fn test_top_clamp_kills_rise() {
        let mut p = Player::new(Vec2::new(400.0, 50.0), ArenaConfig::default());
        assert!(p.try_jump());
        p.update();
        assert_eq!(p.position.y, 48.0);
        assert!(matches!(
            p.stance(),
            Stance::Airborne { vertical_velocity } if vertical_velocity == 0.0
        ));
    }

    #[test]
    fn test_satellite_anchor_is_delayed() {
        let mut p = Player::new(Vec2::new(80.0, 300.0), ArenaConfig::default());
        assert_eq!(p.satellite_anchor(), Vec2::new(80.0, 300.0));

        p.apply_movement(held(false, false, false, true));
        for _ in 0..20 {
            p.update();
        }
        assert_eq!(p.position.x, 150.0);
        assert_eq!(p.satellite_anchor().x, 101.0);
        // Satellite lags behind (negative x) while moving right
        assert!(p.satellite.lag.x < 0.0);
    }

    proptest! {
        #[test]
        fn airborne_never_sinks_below_ground(
            start_y in 60.0f32..590.0,
            holds in proptest::collection::vec(any::<(bool, bool)>(), 1..80),
        ) {
            let mut p = Player::new(Vec2::new(400.0, 300.0), ArenaConfig::default());
            // Take off from an arbitrary row
            p.position.y = start_y;
            prop_assert!(p.try_jump());
            for (up, down) in holds {
                let was_airborne = !p.is_grounded();
                p.apply_movement(HeldKeys { up, down, ..Default::default() });
                let landed = p.update();
                if was_airborne {
                    prop_assert!(p.position.y <= p.ground_level);
                }
                if landed {
                    prop_assert_eq!(p.position.y, 300.0);
                }
            }
        }
    }
}
