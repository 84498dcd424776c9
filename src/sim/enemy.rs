//! Enemy AI for exploration mode
//!
//! A small finite-state machine: patrol toward random targets, chase the
//! player once detected, stop and wind up when in reach. Damage knocks the
//! enemy back and suspends the state machine until the push decays.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::ArenaConfig;
use super::collision::{is_hole_at, is_path_safe, knockback_velocity};
use super::room::HazardField;
use crate::consts::*;
use crate::wrap_phase;

/// AI state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Dormant sentry: holds position until the player comes close
    Idle,
    Patrol,
    Chase,
    Attack,
    /// Terminal
    Dead,
}

/// Distances that drive state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Senses {
    pub dist_to_player: f32,
    pub detection_radius: f32,
    pub attack_radius: f32,
}

/// Transition table, evaluated once per tick after the state's behaviour.
///
/// Returns `None` when the state is unchanged.
pub fn transition(state: EnemyState, senses: Senses) -> Option<EnemyState> {
    let Senses {
        dist_to_player: d,
        detection_radius,
        attack_radius,
    } = senses;

    match state {
        EnemyState::Idle | EnemyState::Patrol if d < detection_radius => Some(EnemyState::Chase),
        EnemyState::Chase if d < attack_radius => Some(EnemyState::Attack),
        EnemyState::Chase if d > detection_radius * 1.5 => Some(EnemyState::Patrol),
        EnemyState::Attack if d > attack_radius * 1.5 => Some(EnemyState::Chase),
        _ => None,
    }
}

/// An exploration-mode enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub patrol_target: Vec2,
    pub speed: f32,
    pub radius: i32,
    pub detection_radius: f32,
    pub attack_radius: f32,
    pub attack_cooldown: u32,
    pub attack_cooldown_max: u32,
    pub knockback_velocity: Vec2,
    pub knockback_frames: u32,
    pub knockback_duration: u32,
    /// Pulse animation (render only)
    pub animation_phase: f32,
    state: EnemyState,
    health: i32,
    max_health: i32,
    arena: ArenaConfig,
}

const PATROL_SPEED_FACTOR: f32 = 0.5;
const PATROL_ARRIVE_DISTANCE: f32 = 5.0;
const ANIMATION_SPEED: f32 = 0.1;

impl Enemy {
    /// New patrolling enemy with default health and a fresh patrol target
    pub fn new(id: u32, position: Vec2, arena: ArenaConfig, rng: &mut impl Rng) -> Self {
        let mut enemy = Self {
            id,
            position,
            velocity: Vec2::ZERO,
            patrol_target: position,
            speed: ENEMY_SPEED,
            radius: ENEMY_RADIUS,
            detection_radius: ENEMY_DETECTION_RADIUS,
            attack_radius: ENEMY_ATTACK_RADIUS,
            attack_cooldown: 0,
            attack_cooldown_max: ENEMY_ATTACK_COOLDOWN,
            knockback_velocity: Vec2::ZERO,
            knockback_frames: 0,
            knockback_duration: KNOCKBACK_DURATION_TICKS,
            animation_phase: 0.0,
            state: EnemyState::Patrol,
            health: ENEMY_HEALTH,
            max_health: ENEMY_HEALTH,
            arena,
        };
        enemy.generate_patrol_target(rng);
        enemy
    }

    /// Override starting and maximum health
    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self.max_health = health;
        self
    }

    /// Start dormant instead of patrolling
    pub fn dormant(mut self) -> Self {
        self.state = EnemyState::Idle;
        self
    }

    #[inline]
    pub fn state(&self) -> EnemyState {
        self.state
    }

    #[inline]
    pub fn health(&self) -> i32 {
        self.health
    }

    #[inline]
    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == EnemyState::Dead
    }

    /// Random point at least two margins away from every wall
    fn generate_patrol_target(&mut self, rng: &mut impl Rng) {
        let inset = self.arena.margin * 2;
        let span_x = (self.arena.width - 2 * inset).max(1);
        let span_y = (self.arena.height - 2 * inset).max(1);
        self.patrol_target = Vec2::new(
            (inset + rng.random_range(0..span_x)) as f32,
            (inset + rng.random_range(0..span_y)) as f32,
        );
    }

    /// Probe a single destination point with the enemy's own radius offsets
    fn is_spot_safe(&self, field: Option<&HazardField>, spot: Vec2) -> bool {
        let Some(field) = field else {
            return true;
        };
        let r = self.radius as f32;
        ![
            spot,
            spot + Vec2::new(r, 0.0),
            spot - Vec2::new(r, 0.0),
            spot + Vec2::new(0.0, r),
            spot - Vec2::new(0.0, r),
        ]
        .into_iter()
        .any(|p| is_hole_at(field, p))
    }

    /// Advance one tick
    pub fn update(&mut self, player_pos: Vec2, field: Option<&HazardField>, rng: &mut impl Rng) {
        if self.is_dead() {
            return;
        }

        // Knockback overrides the state machine
        if self.knockback_frames > 0 {
            self.update_knockback();
            self.position = self.arena.clamp_all(self.position, self.radius);
            return;
        }

        let dist_to_player = self.position.distance(player_pos);

        match self.state {
            EnemyState::Idle => self.velocity = Vec2::ZERO,
            EnemyState::Patrol => self.update_patrol(field, rng),
            EnemyState::Chase => self.update_chase(player_pos, field),
            EnemyState::Attack => self.update_attack(),
            EnemyState::Dead => {}
        }

        let senses = Senses {
            dist_to_player,
            detection_radius: self.detection_radius,
            attack_radius: self.attack_radius,
        };
        if let Some(next) = transition(self.state, senses) {
            self.enter(next, rng);
        }

        self.position = self.arena.clamp_all(self.position, self.radius);
        self.animation_phase = wrap_phase(self.animation_phase + ANIMATION_SPEED);
    }

    /// Entry actions for a new state
    fn enter(&mut self, next: EnemyState, rng: &mut impl Rng) {
        match next {
            EnemyState::Attack => self.attack_cooldown = self.attack_cooldown_max,
            EnemyState::Patrol => self.generate_patrol_target(rng),
            _ => {}
        }
        log::debug!("Enemy {} {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
    }

    fn update_patrol(&mut self, field: Option<&HazardField>, rng: &mut impl Rng) {
        let dist = self.position.distance(self.patrol_target);

        if dist < PATROL_ARRIVE_DISTANCE
            || !is_path_safe(field, self.position, self.patrol_target, self.radius)
        {
            self.generate_patrol_target(rng);
            return;
        }

        let dir = (self.patrol_target - self.position).normalize_or_zero();
        self.velocity = dir * self.speed * PATROL_SPEED_FACTOR;

        let next = self.position + self.velocity;
        if self.is_spot_safe(field, next) {
            self.position = next;
        } else {
            self.generate_patrol_target(rng);
        }
    }

    fn update_chase(&mut self, player_pos: Vec2, field: Option<&HazardField>) {
        let dir = (player_pos - self.position).normalize_or_zero();
        self.velocity = dir * self.speed;

        let next = self.position + self.velocity;
        if self.is_spot_safe(field, next) {
            self.position = next;
            return;
        }

        // Skirt the hazard: left perpendicular first, then right
        let left = Vec2::new(-dir.y, dir.x);
        let right = Vec2::new(dir.y, -dir.x);
        for side in [left, right] {
            let step = self.position + side * self.speed;
            if self.is_spot_safe(field, step) {
                self.position = step;
                self.velocity = side * self.speed;
                return;
            }
        }

        self.velocity = Vec2::ZERO;
    }

    fn update_attack(&mut self) {
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
        self.velocity = Vec2::ZERO;
    }

    fn update_knockback(&mut self) {
        self.position += self.knockback_velocity;
        self.knockback_velocity *= KNOCKBACK_DECAY;
        self.knockback_frames -= 1;

        if self.knockback_frames == 0 {
            self.knockback_velocity = Vec2::ZERO;
        }
    }

    /// Apply damage from an attacker at `attacker_pos`.
    ///
    /// Returns true if this hit killed the enemy. Dead enemies ignore damage.
    pub fn take_damage(&mut self, amount: i32, attacker_pos: Vec2) -> bool {
        if self.is_dead() {
            return false;
        }

        self.health -= amount;
        if self.health <= 0 {
            self.health = 0;
            self.state = EnemyState::Dead;
            self.velocity = Vec2::ZERO;
            self.knockback_velocity = Vec2::ZERO;
            self.knockback_frames = 0;
            return true;
        }

        // Pushed two body radii over the knockback window
        let distance = self.radius as f32 * 2.0;
        self.knockback_velocity = knockback_velocity(
            self.position,
            attacker_pos,
            distance,
            self.knockback_duration,
        );
        self.knockback_frames = self.knockback_duration;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::Difficulty;
    use crate::sim::room::Hole;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(1234)
    }

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy::new(1, Vec2::new(x, y), ArenaConfig::default(), &mut rng())
    }

    fn field_with_holes(holes: &[Vec2]) -> HazardField {
        let mut field =
            HazardField::new(ArenaConfig::default(), 1, Difficulty::Easy, 3, &mut rng());
        field.holes = holes
            .iter()
            .map(|&position| Hole {
                position,
                radius: 16,
            })
            .collect();
        field
    }

    fn senses(d: f32) -> Senses {
        Senses {
            dist_to_player: d,
            detection_radius: 200.0,
            attack_radius: 30.0,
        }
    }

    #[test]
    fn test_transition_table() {
        use EnemyState::*;
        let cases = [
            (Patrol, 199.0, Some(Chase)),
            (Patrol, 200.0, None),
            (Idle, 150.0, Some(Chase)),
            (Idle, 250.0, None),
            (Chase, 29.0, Some(Attack)),
            (Chase, 250.0, None),
            (Chase, 301.0, Some(Patrol)),
            (Attack, 45.0, None),
            (Attack, 46.0, Some(Chase)),
            (Dead, 0.0, None),
        ];
        for (state, d, expected) in cases {
            assert_eq!(transition(state, senses(d)), expected, "{state:?} at {d}");
        }
    }

    #[test]
    fn test_patrol_target_inside_walls() {
        let mut r = rng();
        for i in 0..50 {
            let e = Enemy::new(i, Vec2::new(400.0, 300.0), ArenaConfig::default(), &mut r);
            assert!(e.patrol_target.x >= 80.0 && e.patrol_target.x < 720.0);
            assert!(e.patrol_target.y >= 80.0 && e.patrol_target.y < 520.0);
        }
    }

    #[test]
    fn test_three_hits_kill() {
        let mut e = enemy_at(300.0, 300.0).with_health(3);
        let attacker = Vec2::new(280.0, 300.0);
        assert!(!e.take_damage(1, attacker));
        assert!(!e.take_damage(1, attacker));
        assert!(e.take_damage(1, attacker));
        assert!(e.is_dead());
        assert_eq!(e.health(), 0);

        assert!(!e.take_damage(1, attacker));
        assert_eq!(e.health(), 0);
        assert_eq!(e.state(), EnemyState::Dead);
    }

    #[test]
    fn test_overkill_clamps_to_zero() {
        let mut e = enemy_at(300.0, 300.0);
        assert!(e.take_damage(10, Vec2::ZERO));
        assert_eq!(e.health(), 0);
    }

    #[test]
    fn test_dead_enemy_is_inert() {
        let mut e = enemy_at(300.0, 300.0).with_health(1);
        e.take_damage(1, Vec2::ZERO);
        let before = e.position;
        e.update(Vec2::new(310.0, 300.0), None, &mut rng());
        assert_eq!(e.position, before);
        assert_eq!(e.state(), EnemyState::Dead);
    }

    #[test]
    fn test_knockback_decays_then_state_machine_resumes() {
        let mut r = rng();
        let mut e = enemy_at(300.0, 300.0).with_health(3);
        e.take_damage(1, Vec2::new(280.0, 300.0));
        let initial = e.knockback_velocity.length();
        assert!((initial - 24.0 / 15.0).abs() < 1e-5);
        assert!(e.knockback_velocity.x > 0.0);

        // Player close enough to trigger a chase, but knockback suppresses it
        let player = Vec2::new(280.0, 300.0);
        for n in 1..KNOCKBACK_DURATION_TICKS {
            e.update(player, None, &mut r);
            let expected = initial * KNOCKBACK_DECAY.powi(n as i32);
            assert!((e.knockback_velocity.length() - expected).abs() < 1e-4);
            assert_eq!(e.state(), EnemyState::Patrol);
        }
        e.update(player, None, &mut r);
        assert_eq!(e.knockback_velocity, Vec2::ZERO);
        assert_eq!(e.knockback_frames, 0);
        assert!(e.position.x > 300.0);

        e.update(player, None, &mut r);
        assert_eq!(e.state(), EnemyState::Chase);
    }

    #[test]
    fn test_chase_then_attack_arms_cooldown() {
        let mut r = rng();
        let mut e = enemy_at(300.0, 300.0);
        e.state = EnemyState::Chase;
        e.update(Vec2::new(320.0, 300.0), None, &mut r);
        assert_eq!(e.state(), EnemyState::Attack);
        assert_eq!(e.attack_cooldown, ENEMY_ATTACK_COOLDOWN);

        e.update(Vec2::new(320.0, 300.0), None, &mut r);
        assert_eq!(e.attack_cooldown, ENEMY_ATTACK_COOLDOWN - 1);
        assert_eq!(e.velocity, Vec2::ZERO);

        // Player steps away beyond 1.5x reach
        e.update(Vec2::new(400.0, 300.0), None, &mut r);
        assert_eq!(e.state(), EnemyState::Chase);
    }

    #[test]
    fn test_chase_gives_up_far_away() {
        let mut r = rng();
        let mut e = Enemy::new(1, Vec2::new(100.0, 100.0), ArenaConfig::default(), &mut r);
        e.state = EnemyState::Chase;
        let old_target = e.patrol_target;
        e.update(Vec2::new(700.0, 500.0), None, &mut r);
        assert_eq!(e.state(), EnemyState::Patrol);
        assert_ne!(e.patrol_target, old_target);
    }

    #[test]
    fn test_chase_moves_straight_at_full_speed() {
        let mut e = enemy_at(300.0, 300.0);
        e.state = EnemyState::Chase;
        e.update(Vec2::new(400.0, 300.0), None, &mut rng());
        assert_eq!(e.position, Vec2::new(301.5, 300.0));
    }

    #[test]
    fn test_chase_sidesteps_hole() {
        let field = field_with_holes(&[Vec2::new(328.0, 300.0)]);
        let mut e = enemy_at(300.0, 300.0);
        e.state = EnemyState::Chase;
        e.update(Vec2::new(400.0, 300.0), Some(&field), &mut rng());
        assert_eq!(e.position, Vec2::new(300.0, 301.5));
    }

    #[test]
    fn test_chase_holds_when_boxed_in() {
        let field = field_with_holes(&[Vec2::new(316.0, 300.0)]);
        let mut e = enemy_at(300.0, 300.0);
        e.state = EnemyState::Chase;
        e.update(Vec2::new(400.0, 300.0), Some(&field), &mut rng());
        assert_eq!(e.position, Vec2::new(300.0, 300.0));
        assert_eq!(e.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_patrol_rejects_path_across_hole() {
        let field = field_with_holes(&[Vec2::new(400.0, 300.0)]);
        let mut r = rng();
        let mut e = enemy_at(300.0, 300.0);
        e.patrol_target = Vec2::new(500.0, 300.0);
        e.update(Vec2::new(700.0, 550.0), Some(&field), &mut r);
        assert_ne!(e.patrol_target, Vec2::new(500.0, 300.0));
        assert_eq!(e.position, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn test_patrol_walks_at_half_speed() {
        let mut e = enemy_at(300.0, 300.0);
        e.patrol_target = Vec2::new(500.0, 300.0);
        e.update(Vec2::new(700.0, 550.0), None, &mut rng());
        assert_eq!(e.position, Vec2::new(300.75, 300.0));
        assert_eq!(e.state(), EnemyState::Patrol);
    }

    #[test]
    fn test_idle_wakes_on_detection() {
        let mut r = rng();
        let mut e = enemy_at(300.0, 300.0).dormant();
        e.update(Vec2::new(700.0, 550.0), None, &mut r);
        assert_eq!(e.state(), EnemyState::Idle);
        assert_eq!(e.position, Vec2::new(300.0, 300.0));
        e.update(Vec2::new(350.0, 300.0), None, &mut r);
        assert_eq!(e.state(), EnemyState::Chase);
    }

    #[test]
    fn test_clamped_to_arena() {
        let mut e = enemy_at(10.0, 590.0);
        e.state = EnemyState::Attack;
        e.update(Vec2::new(20.0, 580.0), None, &mut rng());
        assert_eq!(e.position, Vec2::new(52.0, 548.0));
    }

    proptest! {
        #[test]
        fn knockback_always_pushes_away(
            ax in 100.0f32..700.0, ay in 100.0f32..500.0,
            ex in 100.0f32..700.0, ey in 100.0f32..500.0,
        ) {
            let attacker = Vec2::new(ax, ay);
            let start = Vec2::new(ex, ey);
            prop_assume!(start.distance(attacker) > 1.0);
            let mut e = enemy_at(ex, ey).with_health(5);
            e.take_damage(1, attacker);
            prop_assert!(e.knockback_velocity.dot(start - attacker) > 0.0);
            prop_assert_eq!(e.knockback_frames, KNOCKBACK_DURATION_TICKS);
        }
    }
}
