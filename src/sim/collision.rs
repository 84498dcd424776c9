//! Collision and combat queries
//!
//! Everything here is a pure function of positions: hazard containment,
//! directional melee hit zones, knockback vectors and path probing.

use glam::Vec2;

use super::player::Direction;
use super::room::{HazardField, Hole};

/// Spacing between probe points along a path (pixels)
pub const PATH_PROBE_STEP: f32 = 10.0;

/// Result of a melee hit-zone test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeResult {
    /// Whether the target lies in the attack zone
    pub hit: bool,
    /// Offset from attacker to target
    pub delta: Vec2,
}

impl MeleeResult {
    pub fn miss(delta: Vec2) -> Self {
        Self { hit: false, delta }
    }
}

/// Near-point containment: the actor's centre must be within
/// `hole.radius - actor_radius / 2` (integer halving) of the hole centre.
#[inline]
pub fn point_in_hole(pos: Vec2, actor_radius: i32, hole: &Hole) -> bool {
    let threshold = (hole.radius - actor_radius / 2) as f32;
    pos.distance(hole.position) <= threshold
}

/// Contact with a solid circular hazard (stars): the hazard's full radius
/// plus half of the actor's radius.
#[inline]
pub fn touches_circle(pos: Vec2, actor_radius: i32, center: Vec2, radius: i32) -> bool {
    let reach = radius as f32 + (actor_radius / 2) as f32;
    pos.distance(center) <= reach
}

/// Directional melee test.
///
/// The target is hit iff it lies within `range` along the facing axis, on the
/// facing side, and within `band` on the perpendicular axis.
pub fn melee_hit(
    attacker: Vec2,
    facing: Direction,
    target: Vec2,
    range: f32,
    band: f32,
) -> MeleeResult {
    let delta = target - attacker;
    let (dx, dy) = (delta.x, delta.y);

    let hit = match facing {
        Direction::Up => dy < 0.0 && dy.abs() <= range && dx.abs() <= band,
        Direction::Down => dy > 0.0 && dy.abs() <= range && dx.abs() <= band,
        Direction::Left => dx < 0.0 && dx.abs() <= range && dy.abs() <= band,
        Direction::Right => dx > 0.0 && dx.abs() <= range && dy.abs() <= band,
    };

    if hit { MeleeResult { hit, delta } } else { MeleeResult::miss(delta) }
}

/// Per-tick knockback velocity pushing `target` away from `attacker` so that
/// it travels `distance` pixels over `duration` ticks (before decay).
///
/// Coincident positions yield a zero vector.
pub fn knockback_velocity(target: Vec2, attacker: Vec2, distance: f32, duration: u32) -> Vec2 {
    if duration == 0 {
        return Vec2::ZERO;
    }
    let away = (target - attacker).normalize_or_zero();
    away * (distance / duration as f32)
}

/// Hazard probe at a single point (radius-1 probe, i.e. the full hole radius)
#[inline]
pub fn is_hole_at(field: &HazardField, point: Vec2) -> bool {
    field.is_in_hazard(point, 1)
}

/// Walk from `from` toward `to` in `PATH_PROBE_STEP` increments, probing the
/// centre and four points offset by `probe_radius`.
///
/// Without a field every path is safe. Paths shorter than one pixel are safe.
pub fn is_path_safe(field: Option<&HazardField>, from: Vec2, to: Vec2, probe_radius: i32) -> bool {
    let Some(field) = field else {
        return true;
    };

    let offset = to - from;
    let dist = offset.length();
    if dist < 1.0 {
        return true;
    }
    let dir = offset / dist;
    let r = probe_radius as f32;

    let mut d = 0.0;
    while d < dist {
        let p = from + dir * d;
        if is_hole_at(field, p)
            || is_hole_at(field, p + Vec2::new(r, 0.0))
            || is_hole_at(field, p - Vec2::new(r, 0.0))
            || is_hole_at(field, p + Vec2::new(0.0, r))
            || is_hole_at(field, p - Vec2::new(0.0, r))
        {
            return false;
        }
        d += PATH_PROBE_STEP;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::ArenaConfig;
    use crate::sim::difficulty::Difficulty;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field_with_hole(at: Vec2) -> HazardField {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut field = HazardField::new(ArenaConfig::default(), 1, Difficulty::Easy, 3, &mut rng);
        field.holes = vec![Hole {
            position: at,
            radius: 16,
        }];
        field
    }

    #[test]
    fn test_melee_facing_up() {
        let p = Vec2::new(100.0, 100.0);
        assert!(melee_hit(p, Direction::Up, Vec2::new(110.0, 75.0), 30.0, 15.0).hit);
        // Wrong side
        assert!(!melee_hit(p, Direction::Up, Vec2::new(100.0, 120.0), 30.0, 15.0).hit);
        // Outside band
        assert!(!melee_hit(p, Direction::Up, Vec2::new(116.0, 90.0), 30.0, 15.0).hit);
        // Out of range
        assert!(!melee_hit(p, Direction::Up, Vec2::new(100.0, 69.0), 30.0, 15.0).hit);
        // Same position never counts (strict sign test)
        assert!(!melee_hit(p, Direction::Up, p, 30.0, 15.0).hit);
    }

    #[test]
    fn test_melee_each_direction() {
        let p = Vec2::ZERO;
        let cases = [
            (Direction::Down, Vec2::new(0.0, 20.0)),
            (Direction::Left, Vec2::new(-20.0, 5.0)),
            (Direction::Right, Vec2::new(30.0, -15.0)),
        ];
        for (dir, target) in cases {
            let result = melee_hit(p, dir, target, 30.0, 15.0);
            assert!(result.hit, "{dir:?} should hit {target:?}");
            assert_eq!(result.delta, target);
            assert!(!melee_hit(p, dir, -target, 30.0, 15.0).hit);
        }
    }

    #[test]
    fn test_knockback_points_away() {
        let v = knockback_velocity(Vec2::new(10.0, 0.0), Vec2::ZERO, 24.0, 15);
        assert!((v.x - 1.6).abs() < 1e-6);
        assert_eq!(v.y, 0.0);
        assert_eq!(knockback_velocity(Vec2::ONE, Vec2::ONE, 24.0, 15), Vec2::ZERO);
        assert_eq!(knockback_velocity(Vec2::X, Vec2::ZERO, 24.0, 0), Vec2::ZERO);
    }

    #[test]
    fn test_touches_circle() {
        assert!(touches_circle(Vec2::new(14.0, 0.0), 8, Vec2::ZERO, 10));
        assert!(!touches_circle(Vec2::new(14.5, 0.0), 8, Vec2::ZERO, 10));
    }

    #[test]
    fn test_path_through_hole_is_unsafe() {
        let field = field_with_hole(Vec2::new(300.0, 300.0));
        assert!(!is_path_safe(Some(&field), Vec2::new(200.0, 300.0), Vec2::new(400.0, 300.0), 12));
        // Parallel path well clear of the hole
        assert!(is_path_safe(Some(&field), Vec2::new(200.0, 360.0), Vec2::new(400.0, 360.0), 12));
        // Side probes catch a near miss the centre line would not
        assert!(!is_path_safe(Some(&field), Vec2::new(200.0, 325.0), Vec2::new(400.0, 325.0), 12));
    }

    #[test]
    fn test_path_trivial_cases() {
        let field = field_with_hole(Vec2::new(300.0, 300.0));
        assert!(is_path_safe(None, Vec2::new(300.0, 300.0), Vec2::new(310.0, 300.0), 12));
        // Sub-pixel move is always safe, even from inside a hole
        assert!(is_path_safe(Some(&field), Vec2::new(300.0, 300.0), Vec2::new(300.5, 300.0), 12));
    }
}
