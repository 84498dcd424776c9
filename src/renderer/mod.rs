//! Rendering module
//!
//! The game never talks to a graphics API directly. Hosts implement
//! [`DrawPrimitive`] for their backend and [`scene::draw_frame`] walks the
//! current state issuing primitives.

pub mod scene;

use glam::Vec2;

pub use scene::draw_frame;

/// RGBA, 0.0 - 1.0
pub type Color = [f32; 4];

/// Immediate-mode drawing capability supplied by the host
pub trait DrawPrimitive {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color);
    /// Axis-aligned rectangle from its top-left corner
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
    fn point(&mut self, at: Vec2, color: Color);

    /// Text label. Backends without a font may ignore it.
    fn text(&mut self, _at: Vec2, _text: &str, _size: f32, _color: Color) {}
}

/// Scale a color's alpha
#[inline]
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Color constants
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = [0.02, 0.02, 0.05, 1.0];
    pub const WALL: Color = [0.3, 0.3, 0.4, 1.0];
    pub const START_ZONE: Color = [0.2, 0.6, 0.3, 0.35];
    pub const END_ZONE: Color = [0.9, 0.8, 0.2, 0.35];
    pub const HOLE: Color = [0.0, 0.0, 0.0, 1.0];
    pub const HOLE_RIM: Color = [0.6, 0.2, 0.8, 1.0];
    pub const PLAYER: Color = [1.0, 1.0, 1.0, 1.0];
    pub const HALO: Color = [0.4, 0.7, 1.0, 0.6];
    pub const ATTACK: Color = [1.0, 0.5, 0.2, 0.9];
    pub const SATELLITE: Color = [0.6, 0.9, 1.0, 1.0];
    pub const ELECTRIC_STAR: Color = [1.0, 0.9, 0.3, 1.0];
    pub const SATELLITE_STAR: Color = [1.0, 0.5, 0.1, 1.0];
    pub const ENEMY: Color = [0.9, 0.2, 0.25, 1.0];
    pub const ENEMY_ALERT: Color = [1.0, 0.5, 0.5, 1.0];
    pub const HEALTH_BACK: Color = [0.2, 0.0, 0.0, 1.0];
    pub const HEALTH: Color = [0.2, 0.9, 0.3, 1.0];
    pub const LIFE: Color = [1.0, 0.3, 0.4, 1.0];
    pub const TEXT: Color = [0.9, 0.9, 0.95, 1.0];
    pub const HIGHLIGHT: Color = [1.0, 0.85, 0.2, 1.0];
    pub const DIM: Color = [0.5, 0.5, 0.6, 1.0];
}
