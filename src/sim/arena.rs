//! Arena geometry shared by every actor
//!
//! Screen bounds, zone widths and hole insets are threaded through construction
//! instead of living as literals in entity logic.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Playfield dimensions and zone layout (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: i32,
    pub height: i32,
    /// Wall thickness actors are kept away from
    pub margin: i32,
    /// Leaving this strip starts the level timer
    pub start_zone_width: i32,
    /// Reaching this strip on the right completes the level
    pub end_zone_width: i32,
    /// Respawn x inside the start zone (y is the vertical centre)
    pub spawn_x: f32,
    /// Holes are never placed within this distance of the left/right edges
    pub hole_inset_x: i32,
    /// Holes are never placed within this distance of the top/bottom edges
    pub hole_inset_y: i32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            margin: ARENA_MARGIN,
            start_zone_width: START_ZONE_WIDTH,
            end_zone_width: END_ZONE_WIDTH,
            spawn_x: SPAWN_X,
            hole_inset_x: HOLE_INSET_X,
            hole_inset_y: HOLE_INSET_Y,
        }
    }
}

impl ArenaConfig {
    /// Player spawn point in the start zone
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.spawn_x, (self.height / 2) as f32)
    }

    /// Left edge of the end zone
    #[inline]
    pub fn end_zone_x(&self) -> i32 {
        self.width - self.end_zone_width
    }

    /// Clamp an actor's x into `[margin + r, width - margin - r]`
    pub fn clamp_x(&self, x: f32, radius: i32) -> f32 {
        let lo = (self.margin + radius) as f32;
        let hi = (self.width - self.margin - radius) as f32;
        x.max(lo).min(hi)
    }

    /// Lowest y an actor may reach (top wall)
    #[inline]
    pub fn min_y(&self, radius: i32) -> f32 {
        (self.margin + radius) as f32
    }

    /// Highest y an actor may reach (bottom wall)
    #[inline]
    pub fn max_y(&self, radius: i32) -> f32 {
        (self.height - self.margin - radius) as f32
    }

    /// Clamp both axes (enemies are boxed on all four sides)
    pub fn clamp_all(&self, pos: Vec2, radius: i32) -> Vec2 {
        Vec2::new(
            self.clamp_x(pos.x, radius),
            pos.y.max(self.min_y(radius)).min(self.max_y(radius)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let arena = ArenaConfig::default();
        assert_eq!(arena.end_zone_x(), 700);
        assert_eq!(arena.spawn_point(), Vec2::new(80.0, 300.0));
    }

    #[test]
    fn test_clamp_all() {
        let arena = ArenaConfig::default();
        let p = arena.clamp_all(Vec2::new(-50.0, 900.0), 12);
        assert_eq!(p, Vec2::new(52.0, 548.0));
        let inside = Vec2::new(400.0, 300.0);
        assert_eq!(arena.clamp_all(inside, 12), inside);
    }
}
