//! Room generation and hazard queries
//!
//! A room is one level: a field of circular holes between the start zone on
//! the left and the end zone on the right, a level timer that drives the
//! score, and the celebration burst played when the end zone is reached.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::ArenaConfig;
use super::collision::{point_in_hole, touches_circle};
use super::difficulty::Difficulty;
use crate::consts::*;
use crate::wrap_phase;

/// A circular hazard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub position: Vec2,
    pub radius: i32,
}

/// A celebration particle (visual only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [u8; 3],
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Remaining life in [0, 1] for fading
    pub fn life_fraction(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

/// Level timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomTimer {
    /// Player has not left the start zone yet
    Idle,
    Running,
    Stopped,
}

/// Room lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoomPhase {
    Active,
    /// End zone reached; `elapsed` counts seconds since the burst
    Celebrating { elapsed: f32 },
    /// Out of lives. Sticky for the lifetime of this room.
    GameOver,
}

/// Vertically oscillating star, lethal on contact (level 2+)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectricStar {
    pub center: Vec2,
    pub position: Vec2,
    pub radius: i32,
    pub amplitude: f32,
    pub phase: f32,
    /// Radians per second
    pub speed: f32,
}

impl ElectricStar {
    fn update(&mut self, dt: f32) {
        self.phase = wrap_phase(self.phase + self.speed * dt);
        self.position = self.center + Vec2::new(0.0, self.amplitude * self.phase.sin());
    }
}

/// Small star orbiting the electric star (hard only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteStar {
    pub position: Vec2,
    pub radius: i32,
    pub orbit_radius: f32,
    pub angle: f32,
    /// Radians per second
    pub angular_speed: f32,
}

impl SatelliteStar {
    fn update(&mut self, anchor: Vec2, dt: f32) {
        self.angle = wrap_phase(self.angle + self.angular_speed * dt);
        self.position = anchor + Vec2::new(self.angle.cos(), self.angle.sin()) * self.orbit_radius;
    }
}

const ELECTRIC_STAR_RADIUS: i32 = 10;
const ELECTRIC_STAR_SPEED: f32 = 1.5;
const SATELLITE_STAR_RADIUS: i32 = 6;
const SATELLITE_ORBIT_RADIUS: f32 = 30.0;
const SATELLITE_ANGULAR_SPEED: f32 = 3.0;
/// Decorative pulse of hole rims (radians per second)
const PULSE_SPEED: f32 = 3.0;

/// One level's hazard field
#[derive(Debug, Clone)]
pub struct HazardField {
    pub arena: ArenaConfig,
    pub level: u32,
    pub difficulty: Difficulty,
    pub holes: Vec<Hole>,
    pub particles: Vec<Particle>,
    pub end_zone_x: i32,
    pub hole_radius: i32,
    pub elapsed_time: f32,
    pub lives: u32,
    pub electric_star: Option<ElectricStar>,
    pub satellite_star: Option<SatelliteStar>,
    /// Decorative animation phase (radians)
    pub pulse_phase: f32,
    timer: RoomTimer,
    phase: RoomPhase,
}

impl HazardField {
    /// Build and populate the room for `level`.
    ///
    /// `lives` carries the session's remaining lives into this room.
    pub fn new(
        arena: ArenaConfig,
        level: u32,
        difficulty: Difficulty,
        lives: u32,
        rng: &mut impl Rng,
    ) -> Self {
        let mut field = Self {
            arena,
            level,
            difficulty,
            holes: Vec::new(),
            particles: Vec::new(),
            end_zone_x: arena.end_zone_x(),
            hole_radius: PLAYER_RADIUS * 2,
            elapsed_time: 0.0,
            lives,
            electric_star: None,
            satellite_star: None,
            pulse_phase: 0.0,
            timer: RoomTimer::Idle,
            phase: if lives == 0 {
                RoomPhase::GameOver
            } else {
                RoomPhase::Active
            },
        };
        field.generate_holes(rng);
        field.spawn_stars(rng);
        log::info!(
            "Room level {} ({}): {} holes{}",
            level,
            difficulty.as_str(),
            field.holes.len(),
            if field.electric_star.is_some() { ", electric star" } else { "" }
        );
        field
    }

    /// Requested hole count for this level
    pub fn target_hole_count(&self) -> usize {
        (3 * self.level * self.difficulty.value()) as usize
    }

    fn generate_holes(&mut self, rng: &mut impl Rng) {
        self.holes.clear();

        let num_holes = self.target_hole_count();
        let min_x = self.arena.hole_inset_x;
        let max_x = self.arena.width - self.arena.hole_inset_x;
        let min_y = self.arena.hole_inset_y;
        let max_y = self.arena.height - self.arena.hole_inset_y;

        if max_x <= min_x || max_y <= min_y {
            log::warn!(
                "Arena {}x{} leaves no room for holes",
                self.arena.width,
                self.arena.height
            );
            return;
        }

        let min_spacing = (self.hole_radius * 3) as f32;

        for _ in 0..num_holes {
            let mut placed = None;

            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                let candidate = Vec2::new(
                    rng.random_range(min_x..max_x) as f32,
                    rng.random_range(min_y..max_y) as f32,
                );
                let clear = self
                    .holes
                    .iter()
                    .all(|h| h.position.distance(candidate) >= min_spacing);
                if clear {
                    placed = Some(candidate);
                    break;
                }
            }

            match placed {
                Some(position) => self.holes.push(Hole {
                    position,
                    radius: self.hole_radius,
                }),
                None => log::debug!("Hole placement gave up after {MAX_PLACEMENT_ATTEMPTS} attempts"),
            }
        }
    }

    fn spawn_stars(&mut self, rng: &mut impl Rng) {
        if self.level < 2 {
            return;
        }

        let center = Vec2::new(
            (self.arena.width / 2) as f32,
            (self.arena.height / 2) as f32,
        );
        let playable = (self.arena.height - 2 * self.arena.margin) as f32;
        let mut star = ElectricStar {
            center,
            position: center,
            radius: ELECTRIC_STAR_RADIUS,
            amplitude: playable / 3.0,
            phase: rng.random_range(0.0..std::f32::consts::TAU),
            speed: ELECTRIC_STAR_SPEED,
        };
        star.update(0.0);

        if self.difficulty == Difficulty::Hard {
            let mut satellite = SatelliteStar {
                position: star.position,
                radius: SATELLITE_STAR_RADIUS,
                orbit_radius: SATELLITE_ORBIT_RADIUS,
                angle: rng.random_range(0.0..std::f32::consts::TAU),
                angular_speed: SATELLITE_ANGULAR_SPEED,
            };
            satellite.update(star.position, 0.0);
            self.satellite_star = Some(satellite);
        }
        self.electric_star = Some(star);
    }

    /// Near-point containment against every hole.
    ///
    /// The actor only counts as fallen once its centre is within
    /// `hole_radius - actor_radius / 2` of a hole centre.
    pub fn is_in_hazard(&self, pos: Vec2, actor_radius: i32) -> bool {
        self.holes.iter().any(|h| point_in_hole(pos, actor_radius, h))
    }

    /// Contact with either star
    pub fn touches_star(&self, pos: Vec2, actor_radius: i32) -> bool {
        let electric = self
            .electric_star
            .as_ref()
            .is_some_and(|s| touches_circle(pos, actor_radius, s.position, s.radius));
        let satellite = self
            .satellite_star
            .as_ref()
            .is_some_and(|s| touches_circle(pos, actor_radius, s.position, s.radius));
        electric || satellite
    }

    /// Anything that costs the player a life
    pub fn is_lethal(&self, pos: Vec2, actor_radius: i32) -> bool {
        self.is_in_hazard(pos, actor_radius) || self.touches_star(pos, actor_radius)
    }

    /// True iff `pos` is in the end zone (y is ignored)
    pub fn has_reached_end(&self, pos: Vec2) -> bool {
        pos.x >= self.end_zone_x as f32
    }

    /// Advance timer, decorations and celebration particles
    pub fn tick(&mut self, dt: f32) {
        if self.timer == RoomTimer::Running {
            self.elapsed_time += dt;
        }

        self.pulse_phase = wrap_phase(self.pulse_phase + PULSE_SPEED * dt);
        if let Some(star) = self.electric_star.as_mut() {
            star.update(dt);
            if let Some(satellite) = self.satellite_star.as_mut() {
                satellite.update(star.position, dt);
            }
        }

        if let RoomPhase::Celebrating { elapsed } = &mut self.phase {
            *elapsed += dt;

            for particle in self.particles.iter_mut() {
                particle.pos += particle.vel * dt;
                particle.vel.y += PARTICLE_GRAVITY * dt;
                particle.life -= dt;
            }
            self.particles.retain(|p| p.life > 0.0);
        }
    }

    /// Start (or restart) the level timer from zero
    pub fn start_timer(&mut self) {
        self.elapsed_time = 0.0;
        self.timer = RoomTimer::Running;
    }

    pub fn stop_timer(&mut self) {
        if self.timer == RoomTimer::Running {
            self.timer = RoomTimer::Stopped;
        }
    }

    #[inline]
    pub fn timer(&self) -> RoomTimer {
        self.timer
    }

    #[inline]
    pub fn timer_running(&self) -> bool {
        self.timer == RoomTimer::Running
    }

    #[inline]
    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    /// Time-based score: 1000 minus ten points per second, floored at zero
    pub fn score(&self) -> i32 {
        let penalty = (self.elapsed_time * 10.0).floor() as i32;
        (BASE_SCORE - penalty).max(0)
    }

    /// Remove one life; the room ends when none are left.
    ///
    /// No-op once lives reach zero.
    pub fn lose_life(&mut self) {
        if self.lives == 0 {
            return;
        }
        self.lives -= 1;
        if self.lives == 0 {
            self.phase = RoomPhase::GameOver;
            self.stop_timer();
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == RoomPhase::GameOver
    }

    #[inline]
    pub fn is_celebrating(&self) -> bool {
        matches!(self.phase, RoomPhase::Celebrating { .. })
    }

    /// Seconds spent celebrating (0 when not celebrating)
    pub fn celebration_time(&self) -> f32 {
        match self.phase {
            RoomPhase::Celebrating { elapsed } => elapsed,
            _ => 0.0,
        }
    }

    /// Burst of particles at `pos`; enters the celebrating phase
    pub fn create_celebration_particles(&mut self, pos: Vec2, rng: &mut impl Rng) {
        if self.is_game_over() {
            return;
        }

        self.particles.reserve(CELEBRATION_PARTICLES);
        for _ in 0..CELEBRATION_PARTICLES {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let speed = rng.random_range(100.0..300.0);
            let life = rng.random_range(1.0..2.0);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color: [
                    rng.random_range(100..=255),
                    rng.random_range(100..=255),
                    rng.random_range(100..=255),
                ],
                life,
                max_life: life,
            });
        }
        self.phase = RoomPhase::Celebrating { elapsed: 0.0 };
    }
}
