//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session state machine deterministically.

use glam::Vec2;

use super::collision::{is_path_safe, melee_hit};
use super::player::{Direction, HeldKeys, Player};
use super::state::{GameEvent, GamePhase, GameState, HitPolicy};
use crate::consts::*;
use crate::menu::{MenuAction, MenuEvent};

/// Discrete key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Jump,
    Attack,
    Confirm,
    Escape,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement keys currently held
    pub held: HeldKeys,
    /// Keys pressed since the previous tick, in order
    pub pressed: Vec<Key>,
    /// Idle/demo mode - the autopilot plays the game
    pub autopilot: bool,
}

impl TickInput {
    pub fn press(key: Key) -> Self {
        Self {
            pressed: vec![key],
            ..Default::default()
        }
    }

    pub fn hold(held: HeldKeys) -> Self {
        Self {
            held,
            ..Default::default()
        }
    }
}

/// Distance ahead the autopilot looks for holes
const AUTOPILOT_LOOKAHEAD: f32 = 60.0;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    let autopilot_input;
    let input = if input.autopilot {
        autopilot_input = autopilot(state);
        &autopilot_input
    } else {
        input
    };

    match state.phase {
        GamePhase::Menu => tick_menu(state, &input.pressed),
        GamePhase::Playing => tick_room(state, input, dt),
        GamePhase::Exploration => tick_exploration(state, input, dt),
    }
}

fn tick_menu(state: &mut GameState, pressed: &[Key]) {
    for &key in pressed {
        let Some(event) = state.menu.handle_key(key) else {
            continue;
        };

        match event {
            MenuEvent::Moved => state.events.push(GameEvent::MenuMoved),
            MenuEvent::Opened(_) => state.events.push(GameEvent::MenuConfirmed),
            MenuEvent::Action(action) => {
                state.events.push(GameEvent::MenuConfirmed);
                match action {
                    MenuAction::StartGame(difficulty) => state.start_new_game(difficulty),
                    MenuAction::Continue => {
                        if !state.continue_game() {
                            log::debug!("Nothing to continue");
                        }
                    }
                    MenuAction::Explore => state.start_exploration(),
                    MenuAction::Quit => {
                        state.quit_requested = true;
                        state.events.push(GameEvent::QuitRequested);
                    }
                }
            }
        }

        // Remaining keys belong to the new mode's next tick
        if state.phase != GamePhase::Menu {
            break;
        }
    }
}

/// Jump/attack/escape presses shared by both play modes.
///
/// Returns false if Escape left for the menu.
fn handle_action_keys(state: &mut GameState, pressed: &[Key], frozen: bool) -> bool {
    for &key in pressed {
        match key {
            Key::Escape => {
                state.open_menu();
                return false;
            }
            Key::Jump if !frozen => {
                if state.player.try_jump() {
                    state.events.push(GameEvent::Jumped);
                }
            }
            Key::Attack if !frozen => {
                if state.player.try_attack() {
                    state.swing_hits.clear();
                    state.events.push(GameEvent::AttackStarted);
                }
            }
            _ => {}
        }
    }
    true
}

fn update_player(state: &mut GameState, held: HeldKeys) {
    state.player.apply_movement(held);
    if state.player.update() {
        state.events.push(GameEvent::Landed);
    }
}

fn tick_room(state: &mut GameState, input: &TickInput, dt: f32) {
    let game_over = state.room.as_ref().is_none_or(|r| r.is_game_over());
    if !handle_action_keys(state, &input.pressed, game_over) {
        return;
    }

    if !game_over {
        update_player(state, input.held);
    }

    let Some(room) = state.room.as_mut() else {
        return;
    };
    room.tick(dt);

    if room.is_game_over() {
        return;
    }

    let pos = state.player.position;

    // Timer starts once per level when leaving the start zone
    if !state.level_started && pos.x > state.arena.start_zone_width as f32 {
        room.start_timer();
        state.level_started = true;
    }

    if !room.is_celebrating() {
        if room.is_lethal(pos, state.player.radius) {
            room.lose_life();
            state.progress.player_lives = room.lives;

            if room.is_game_over() {
                state.progress.game_over = true;
                log::info!(
                    "Game over on level {} with {} points",
                    state.progress.current_level,
                    state.progress.total_score
                );
                state.events.push(GameEvent::GameOver {
                    total_score: state.progress.total_score,
                });
            } else {
                log::debug!("Fell at {pos:?}, {} lives left", room.lives);
                state.events.push(GameEvent::FellInHole {
                    lives_left: room.lives,
                });
            }
            state.player = Player::spawn(state.arena);
            return;
        }

        if room.has_reached_end(pos) {
            room.stop_timer();
            room.create_celebration_particles(pos, &mut state.rng);
            let score = room.score();
            state.events.push(GameEvent::LevelCleared {
                level: state.progress.current_level,
                score,
                total_score: state.progress.total_score + score,
            });
        }
        return;
    }

    if room.celebration_time() > CELEBRATION_DELAY {
        state.advance_level();
    }
}

fn tick_exploration(state: &mut GameState, input: &TickInput, dt: f32) {
    if !handle_action_keys(state, &input.pressed, false) {
        return;
    }
    update_player(state, input.held);

    if let Some(field) = state.room.as_mut() {
        field.tick(dt);
    }

    state.normalize_order();
    let player_pos = state.player.position;
    for enemy in state.enemies.iter_mut() {
        enemy.update(player_pos, state.room.as_ref(), &mut state.rng);
    }

    if state.player.is_attacking() {
        resolve_melee(state);
    }

    // Sweep the dead
    state.enemies.retain(|e| !e.is_dead());
}

fn resolve_melee(state: &mut GameState) {
    let attacker = state.player.position;
    let facing = state.player.direction;
    let range = state.player.attack_range();

    for enemy in state.enemies.iter_mut().filter(|e| !e.is_dead()) {
        if !melee_hit(attacker, facing, enemy.position, range, ATTACK_BAND).hit {
            continue;
        }
        if state.hit_policy == HitPolicy::OncePerSwing {
            if state.swing_hits.contains(&enemy.id) {
                continue;
            }
            state.swing_hits.push(enemy.id);
        }

        if enemy.take_damage(1, attacker) {
            log::debug!("Enemy {} defeated", enemy.id);
            state.events.push(GameEvent::EnemyDefeated { id: enemy.id });
        } else {
            state.events.push(GameEvent::EnemyHit { id: enemy.id });
        }
    }
}

/// Demo input: navigate the menu into a game, then steer right through
/// the room, sidestepping holes in the current lane.
pub fn autopilot(state: &GameState) -> TickInput {
    match state.phase {
        GamePhase::Menu => TickInput::press(Key::Confirm),
        GamePhase::Playing => {
            let game_over = state.room.as_ref().is_none_or(|r| r.is_game_over());
            if game_over {
                TickInput::press(Key::Escape)
            } else {
                TickInput::hold(room_autopilot(state))
            }
        }
        GamePhase::Exploration => exploration_autopilot(state),
    }
}

fn room_autopilot(state: &GameState) -> HeldKeys {
    let Some(room) = state.room.as_ref() else {
        return HeldKeys::default();
    };
    if room.is_celebrating() {
        return HeldKeys::default();
    }

    let pos = state.player.position;
    let ahead = pos + Vec2::new(AUTOPILOT_LOOKAHEAD, 0.0);
    if is_path_safe(Some(room), pos, ahead, state.player.radius) {
        return HeldKeys {
            right: true,
            ..Default::default()
        };
    }

    // Step away from the nearest hole in the lane, unless a wall is in the way
    let nearest = room
        .holes
        .iter()
        .filter(|h| h.position.x >= pos.x - h.radius as f32)
        .min_by(|a, b| {
            a.position
                .distance_squared(pos)
                .partial_cmp(&b.position.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    let hole_below = nearest.is_some_and(|h| h.position.y >= pos.y);
    let room_above = pos.y - state.player.speed > state.arena.min_y(state.player.radius) + 1.0;
    let room_below = pos.y + state.player.speed < state.arena.max_y(state.player.radius) - 1.0;

    let go_up = (hole_below && room_above) || !room_below;
    HeldKeys {
        up: go_up,
        down: !go_up,
        ..Default::default()
    }
}

fn exploration_autopilot(state: &GameState) -> TickInput {
    let pos = state.player.position;
    let Some(target) = state
        .enemies
        .iter()
        .filter(|e| !e.is_dead())
        .min_by(|a, b| {
            a.position
                .distance_squared(pos)
                .partial_cmp(&b.position.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    else {
        return TickInput::press(Key::Escape);
    };

    let range = state.player.attack_range();
    let result = melee_hit(pos, state.player.direction, target.position, range, ATTACK_BAND);
    if result.hit {
        return TickInput::press(Key::Attack);
    }

    let delta = result.delta;
    let facing = if delta.x.abs() >= delta.y.abs() {
        if delta.x >= 0.0 { Direction::Right } else { Direction::Left }
    } else if delta.y >= 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };

    let held = HeldKeys {
        up: facing == Direction::Up,
        down: facing == Direction::Down,
        left: facing == Direction::Left,
        right: facing == Direction::Right,
    };
    TickInput::hold(held)
}
