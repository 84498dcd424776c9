//! Scene walk: turns a `GameState` into draw primitives

use glam::Vec2;

use super::{DrawPrimitive, colors, with_alpha};
use crate::consts::ATTACK_DURATION_TICKS;
use crate::highscores::HighScores;
use crate::menu::{MainOption, MenuScreen};
use crate::sim::{Difficulty, Direction, EnemyState, GamePhase, GameState, HazardField, Player};

const TITLE_SIZE: f32 = 32.0;
const ITEM_SIZE: f32 = 20.0;
const ITEM_SPACING: f32 = 36.0;
const HUD_SIZE: f32 = 16.0;
const HEALTH_BAR_HEIGHT: f32 = 4.0;

/// Draw one frame for the current state
pub fn draw_frame(state: &GameState, scores: &HighScores, out: &mut impl DrawPrimitive) {
    let size = Vec2::new(state.arena.width as f32, state.arena.height as f32);
    out.fill_rect(Vec2::ZERO, size, colors::BACKGROUND);

    match state.phase {
        GamePhase::Menu => draw_menu(state, scores, size, out),
        GamePhase::Playing => {
            if let Some(room) = state.room.as_ref() {
                draw_room(room, out);
                draw_player(&state.player, out);
                draw_hud(state, room, out);
            }
        }
        GamePhase::Exploration => {
            draw_walls(size, state.arena.margin as f32, out);
            if let Some(room) = state.room.as_ref() {
                draw_holes(room, out);
            }
            draw_enemies(state, out);
            draw_player(&state.player, out);
        }
    }
}

fn draw_menu(state: &GameState, scores: &HighScores, size: Vec2, out: &mut impl DrawPrimitive) {
    let menu = &state.menu;
    let cx = size.x / 2.0;
    out.text(Vec2::new(cx, size.y * 0.2), "AMAZING BALL", TITLE_SIZE, colors::TEXT);

    let top = size.y * 0.4;
    let item = |i: usize| Vec2::new(cx, top + i as f32 * ITEM_SPACING);

    match menu.screen() {
        MenuScreen::Main => {
            for (i, option) in MainOption::ALL.iter().enumerate() {
                let color = if i == menu.selected() {
                    colors::HIGHLIGHT
                } else if *option == MainOption::Continue && !state.can_continue() {
                    colors::DIM
                } else {
                    colors::TEXT
                };
                out.text(item(i), option.label(), ITEM_SIZE, color);
            }
        }
        MenuScreen::DifficultySelect => {
            for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
                let color = if i == menu.selected() { colors::HIGHLIGHT } else { colors::TEXT };
                out.text(item(i), difficulty.as_str(), ITEM_SIZE, color);
            }
        }
        MenuScreen::Credits => {
            out.text(item(0), "A HOLE-DODGING ARCADE GAME", ITEM_SIZE, colors::TEXT);
            out.text(item(2), "PRESS ENTER", HUD_SIZE, colors::DIM);
        }
        MenuScreen::HighScores => {
            for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
                let line = format!("{}  {}", difficulty.as_str(), scores.get(*difficulty));
                out.text(item(i), &line, ITEM_SIZE, colors::TEXT);
            }
        }
    }
}

fn draw_walls(size: Vec2, margin: f32, out: &mut impl DrawPrimitive) {
    out.fill_rect(Vec2::ZERO, Vec2::new(size.x, margin), colors::WALL);
    out.fill_rect(Vec2::new(0.0, size.y - margin), Vec2::new(size.x, margin), colors::WALL);
    out.fill_rect(Vec2::ZERO, Vec2::new(margin, size.y), colors::WALL);
    out.fill_rect(Vec2::new(size.x - margin, 0.0), Vec2::new(margin, size.y), colors::WALL);
}

fn draw_holes(room: &HazardField, out: &mut impl DrawPrimitive) {
    let pulse = 1.0 + 0.1 * room.pulse_phase.sin();
    for hole in &room.holes {
        let r = hole.radius as f32;
        out.fill_circle(hole.position, r, colors::HOLE);
        out.stroke_circle(hole.position, r * pulse, 2.0, colors::HOLE_RIM);
    }
}

fn draw_room(room: &HazardField, out: &mut impl DrawPrimitive) {
    let arena = &room.arena;
    let size = Vec2::new(arena.width as f32, arena.height as f32);
    let margin = arena.margin as f32;

    draw_walls(size, margin, out);

    let inner_height = size.y - 2.0 * margin;
    out.fill_rect(
        Vec2::new(margin, margin),
        Vec2::new(arena.start_zone_width as f32 - margin, inner_height),
        colors::START_ZONE,
    );
    out.fill_rect(
        Vec2::new(room.end_zone_x as f32, margin),
        Vec2::new(arena.end_zone_width as f32 - margin, inner_height),
        colors::END_ZONE,
    );

    draw_holes(room, out);

    if let Some(star) = room.electric_star.as_ref() {
        let r = star.radius as f32;
        out.fill_circle(star.position, r, colors::ELECTRIC_STAR);
        // Spikes
        for k in 0..4 {
            let angle = star.phase + k as f32 * std::f32::consts::FRAC_PI_4 * 2.0;
            let dir = Vec2::new(angle.cos(), angle.sin());
            out.line(star.position - dir * r * 1.6, star.position + dir * r * 1.6, colors::ELECTRIC_STAR);
        }
    }
    if let Some(star) = room.satellite_star.as_ref() {
        out.fill_circle(star.position, star.radius as f32, colors::SATELLITE_STAR);
    }

    for p in &room.particles {
        let [r, g, b] = p.color;
        let color = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0];
        out.point(p.pos, with_alpha(color, p.life_fraction()));
    }
}

fn draw_player(player: &Player, out: &mut impl DrawPrimitive) {
    let r = player.radius as f32;
    let halo = r + 3.0 + player.halo_phase.sin();
    out.stroke_circle(player.position, halo, 1.0, colors::HALO);
    out.fill_circle(player.position, r, colors::PLAYER);

    if player.is_attacking() {
        let facing = match player.direction {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        };
        let tip = player.position + facing * player.attack_range();
        // Swing fades over the melee window
        let fade = player.attack_ticks_left() as f32 / ATTACK_DURATION_TICKS as f32;
        out.line(player.position, tip, with_alpha(colors::ATTACK, fade));
    }

    let sat = player.satellite_position();
    out.fill_circle(sat, player.satellite.radius as f32, colors::SATELLITE);
}

fn draw_hud(state: &GameState, room: &HazardField, out: &mut impl DrawPrimitive) {
    let margin = room.arena.margin as f32;
    let y = margin / 2.0;

    // One bar per remaining life
    for i in 0..room.lives {
        let x = margin + i as f32 * 14.0;
        out.fill_rect(Vec2::new(x, y - 4.0), Vec2::new(10.0, 8.0), colors::LIFE);
    }

    let total = state.progress.total_score;
    let hud = format!(
        "LEVEL {}  TIME {:.1}  SCORE {}  TOTAL {}",
        room.level,
        room.elapsed_time,
        room.score(),
        total
    );
    out.text(Vec2::new(margin + 60.0, y), &hud, HUD_SIZE, colors::TEXT);

    if room.is_game_over() {
        let center = Vec2::new(room.arena.width as f32 / 2.0, room.arena.height as f32 / 2.0);
        out.text(center, "GAME OVER", TITLE_SIZE, colors::LIFE);
        let line = format!("TOTAL {}", total);
        out.text(center + Vec2::new(0.0, ITEM_SPACING), &line, ITEM_SIZE, colors::TEXT);
    }
}

fn draw_enemies(state: &GameState, out: &mut impl DrawPrimitive) {
    for enemy in &state.enemies {
        let r = enemy.radius as f32;
        let color = match enemy.state() {
            EnemyState::Chase | EnemyState::Attack => colors::ENEMY_ALERT,
            _ => colors::ENEMY,
        };
        let pulse = 1.0 + 0.08 * enemy.animation_phase.sin();
        out.fill_circle(enemy.position, r * pulse, color);

        // Health bar above the body
        let width = r * 2.0;
        let min = enemy.position - Vec2::new(r, r + 8.0);
        let fraction = enemy.health() as f32 / enemy.max_health().max(1) as f32;
        out.fill_rect(min, Vec2::new(width, HEALTH_BAR_HEIGHT), colors::HEALTH_BACK);
        out.fill_rect(min, Vec2::new(width * fraction, HEALTH_BAR_HEIGHT), colors::HEALTH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Color;

    /// Counts primitives by kind and keeps the text labels
    #[derive(Default)]
    struct Recorder {
        circles: usize,
        strokes: usize,
        rects: usize,
        lines: usize,
        points: usize,
        line_alpha: Option<f32>,
        texts: Vec<String>,
    }

    impl DrawPrimitive for Recorder {
        fn fill_circle(&mut self, _: Vec2, _: f32, _: Color) {
            self.circles += 1;
        }
        fn stroke_circle(&mut self, _: Vec2, _: f32, _: f32, _: Color) {
            self.strokes += 1;
        }
        fn fill_rect(&mut self, _: Vec2, _: Vec2, _: Color) {
            self.rects += 1;
        }
        fn line(&mut self, _: Vec2, _: Vec2, color: Color) {
            self.lines += 1;
            self.line_alpha = Some(color[3]);
        }
        fn point(&mut self, _: Vec2, _: Color) {
            self.points += 1;
        }
        fn text(&mut self, _: Vec2, text: &str, _: f32, _: Color) {
            self.texts.push(text.to_string());
        }
    }

    #[test]
    fn test_menu_lists_options() {
        let state = GameState::new(1);
        let mut out = Recorder::default();
        draw_frame(&state, &HighScores::default(), &mut out);
        assert_eq!(out.rects, 1);
        assert!(out.texts.iter().any(|t| t == "PLAY"));
        assert!(out.texts.iter().any(|t| t == "QUIT"));
    }

    #[test]
    fn test_room_draws_holes_and_player() {
        let mut state = GameState::new(2);
        state.start_new_game(Difficulty::Easy);
        let holes = state.room.as_ref().unwrap().holes.len();

        let mut out = Recorder::default();
        draw_frame(&state, &HighScores::default(), &mut out);
        // Holes + player + satellite
        assert_eq!(out.circles, holes + 2);
        // Hole rims + halo
        assert_eq!(out.strokes, holes + 1);
        // Background, 4 walls, 2 zones, 3 lives
        assert_eq!(out.rects, 10);
        assert!(out.texts.iter().any(|t| t.starts_with("LEVEL 1")));
    }

    #[test]
    fn test_attack_swing_fades() {
        let mut state = GameState::new(5);
        state.start_new_game(Difficulty::Easy);
        let mut out = Recorder::default();
        draw_frame(&state, &HighScores::default(), &mut out);
        assert_eq!(out.lines, 0);

        assert!(state.player.try_attack());
        let mut out = Recorder::default();
        draw_frame(&state, &HighScores::default(), &mut out);
        assert_eq!(out.lines, 1);
        assert_eq!(out.line_alpha, Some(colors::ATTACK[3]));

        state.player.update();
        let mut out = Recorder::default();
        draw_frame(&state, &HighScores::default(), &mut out);
        let alpha = out.line_alpha.unwrap();
        assert!(alpha > 0.0 && alpha < colors::ATTACK[3]);
    }

    #[test]
    fn test_exploration_health_bars() {
        let mut state = GameState::new(3);
        state.start_exploration();
        let mut out = Recorder::default();
        draw_frame(&state, &HighScores::default(), &mut out);
        // Background, 4 walls, 2 bars per enemy
        assert_eq!(out.rects, 5 + 2 * state.enemies.len());
    }

    #[test]
    fn test_high_scores_page() {
        let mut state = GameState::new(4);
        state.menu.handle_key(crate::sim::Key::Right);
        let scores = HighScores { easy: 10, medium: 20, hard: 30 };
        let mut out = Recorder::default();
        draw_frame(&state, &scores, &mut out);
        assert!(out.texts.iter().any(|t| t == "Hard  30"));
    }
}
